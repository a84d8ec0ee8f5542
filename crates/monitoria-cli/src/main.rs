use std::env;
use std::sync::Arc;

use anyhow::{Context, bail};
use tracing::info;

use monitoria_client::{
    ApiClient, ApiError, FileTokenStore, FilterCoordinator, FilterField, MessageStore,
};
use monitoria_types::models::Label;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "monitoria=info".into()),
        )
        .init();

    // Config
    let base_url =
        env::var("MONITORIA_API_URL").unwrap_or_else(|_| "http://localhost:5001".into());
    let token_file =
        env::var("MONITORIA_TOKEN_FILE").unwrap_or_else(|_| "monitoria_session.json".into());

    let tokens = Arc::new(FileTokenStore::new(&token_file));
    let client = ApiClient::new(&base_url)?;
    let store = MessageStore::new(client, tokens);

    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("list") => {
            store.load().await?;
            print_records(&store);
        }

        Some("filter") => {
            // Each key=value pair replaces one field and re-applies, matching
            // the form's change-driven behavior. `filter` alone resets.
            let mut coordinator = FilterCoordinator::new();
            if args.len() == 1 {
                coordinator.reset(&store).await?;
            }
            for pair in &args[1..] {
                let (key, value) = pair
                    .split_once('=')
                    .with_context(|| format!("expected key=value, got `{pair}`"))?;
                let field: FilterField = key.parse().map_err(anyhow::Error::msg)?;
                coordinator.update(&store, field, value).await?;
            }
            print_records(&store);
        }

        Some("label") => {
            let id: i64 = args
                .get(1)
                .context("usage: monitoria label <message-id> <0|1>")?
                .parse()
                .context("message id must be an integer")?;
            let value: i64 = args
                .get(2)
                .context("usage: monitoria label <message-id> <0|1>")?
                .parse()
                .context("label must be 0 or 1")?;
            let label = Label::try_from(value).map_err(anyhow::Error::msg)?;

            match store.set_label(id, label).await {
                Ok(()) => info!(id, value, "label saved"),
                Err(err @ ApiError::AuthRequired) => bail!("{err}"),
                Err(err) => bail!("labeling failed: {err}"),
            }
        }

        Some("channels") => {
            for channel in store.list_channels().await? {
                println!("{channel}");
            }
        }

        Some(other) => bail!("unknown command `{other}` (expected list, filter, label or channels)"),
    }

    Ok(())
}

fn print_records(store: &MessageStore) {
    let records = store.records();
    for record in &records {
        let label = match record.label {
            Some(Label::Relevant) => "relevant",
            Some(Label::NotRelevant) => "not relevant",
            None => "-",
        };
        println!(
            "{:>12}  {:>7.2}  {:<12}  {}",
            record.id, record.score, label, record.url
        );
    }
    match store.total_messages() {
        Some(total) => println!("{} shown of {} matching", records.len(), total),
        None => println!("{} messages", records.len()),
    }
}
