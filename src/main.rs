use async_trait::async_trait;
use share_relay::client::ShareClient;
use share_relay::config::ConfigStore;
use share_relay::constants::CONFIG_PATH;
use share_relay::deeplink::parse_setup_link;
use share_relay::error::{ShareError, ShareResult};
use share_relay::logging::{init_logging, install_panic_hook};
use share_relay::models::{Group, ShareContent};
use share_relay::negotiation::{run_share, GroupChooser};
use std::path::Path;
use tracing::info;

/// Terminal stand-in for the group selection sheet: list the server's
/// groups, accept a number, a new group name, or an empty line to cancel.
struct PromptChooser;

#[async_trait]
impl GroupChooser for PromptChooser {
    async fn choose(&self, groups: &[Group]) -> Option<Group> {
        println!("The server wants this share routed into a group:");
        for (index, group) in groups.iter().enumerate() {
            match &group.description {
                Some(description) => {
                    println!("  {}. {} - {}", index + 1, group.name, description)
                }
                None => println!("  {}. {}", index + 1, group.name),
            }
        }
        println!("Pick a number, type a new group name, or press Enter to cancel:");

        let line = tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            std::io::stdin().read_line(&mut line).ok().map(|_| line)
        })
        .await
        .ok()
        .flatten()?;

        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        if let Ok(index) = line.parse::<usize>() {
            if index >= 1 && index <= groups.len() {
                return Some(groups[index - 1].clone());
            }
        }

        Some(Group::proposed(line))
    }
}

fn usage() {
    eprintln!("Usage: share-relay <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  setup <url> [api-key]            Fetch and persist the configuration");
    eprintln!("  link <setup-uri>                 Configure from a setup deep link");
    eprintln!("  status                           Show the current configuration");
    eprintln!("  share <text> [--title T] [--subject S]");
    eprintln!("  share-image <path> [--text T] [--title T] [--subject S]");
    eprintln!("  clear                            Remove the configuration");
}

async fn setup(store: &ConfigStore, url: &str, api_key: Option<&str>) -> ShareResult<()> {
    let client = ShareClient::new()?;
    let fetch = client.fetch_configuration(url, api_key).await?;
    let config = store.apply_fetch(&fetch, api_key)?;

    info!("Configured \"{}\"", fetch.name);
    println!("Configured: {}", fetch.name);
    println!(
        "Endpoint:   {}",
        config.post_endpoint.as_deref().unwrap_or("(none)")
    );
    Ok(())
}

fn require_arg<'a>(rest: &'a [String], what: &str) -> &'a str {
    match rest.first() {
        Some(arg) => arg,
        None => {
            eprintln!("Missing argument: {}", what);
            usage();
            std::process::exit(2);
        }
    }
}

async fn cmd_setup(store: &ConfigStore, rest: &[String]) -> ShareResult<()> {
    let url = require_arg(rest, "configuration URL");
    setup(store, url, rest.get(1).map(String::as_str)).await
}

async fn cmd_link(store: &ConfigStore, rest: &[String]) -> ShareResult<()> {
    let uri = require_arg(rest, "setup URI");
    let link = parse_setup_link(uri)?;
    setup(store, &link.config_url, link.api_key.as_deref()).await
}

fn cmd_status(store: &ConfigStore) {
    let config = store.load();
    if !config.is_configured() {
        println!("Not configured. Run: share-relay setup <url>");
        return;
    }

    println!(
        "Name:     {}",
        config.share_name.as_deref().unwrap_or("Custom Share")
    );
    println!(
        "Endpoint: {}",
        config.post_endpoint.as_deref().unwrap_or_default()
    );
    if let Some(icon) = config.icon_url.as_deref() {
        println!("Icon:     {}", icon);
    }
}

/// Split `rest` into positional arguments and `--flag value` pairs.
fn split_flags(rest: &[String]) -> (Vec<&str>, Vec<(&str, &str)>) {
    let mut positional = Vec::new();
    let mut flags = Vec::new();

    let mut iter = rest.iter();
    while let Some(arg) = iter.next() {
        if let Some(name) = arg.strip_prefix("--") {
            if let Some(value) = iter.next() {
                flags.push((name, value.as_str()));
            }
        } else {
            positional.push(arg.as_str());
        }
    }

    (positional, flags)
}

fn flag<'a>(flags: &[(&str, &'a str)], name: &str) -> Option<String> {
    flags
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

async fn cmd_share(store: &ConfigStore, rest: &[String]) -> ShareResult<()> {
    let (positional, flags) = split_flags(rest);
    let text = positional.join(" ");
    if text.is_empty() {
        eprintln!("No content to share");
        std::process::exit(2);
    }

    let content = ShareContent::Text {
        text,
        title: flag(&flags, "title"),
        subject: flag(&flags, "subject"),
    };

    share(store, &content).await
}

async fn cmd_share_image(store: &ConfigStore, rest: &[String]) -> ShareResult<()> {
    let (positional, flags) = split_flags(rest);
    let path = match positional.first() {
        Some(path) => Path::new(*path),
        None => {
            eprintln!("No image to share");
            std::process::exit(2);
        }
    };

    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    let content = ShareContent::Image {
        bytes,
        file_name,
        mime_type,
        text: flag(&flags, "text"),
        title: flag(&flags, "title"),
        subject: flag(&flags, "subject"),
    };

    share(store, &content).await
}

async fn share(store: &ConfigStore, content: &ShareContent) -> ShareResult<()> {
    let config = store.load();
    if !config.is_configured() {
        return Err(ShareError::NotConfigured);
    }

    let client = ShareClient::new()?;
    info!("Sharing {} content", content.kind());
    run_share(&client, &config, content, &PromptChooser).await?;
    println!("Shared.");
    Ok(())
}

fn cmd_clear(store: &ConfigStore) -> ShareResult<()> {
    store.clear()?;
    println!("Configuration cleared.");
    Ok(())
}

#[tokio::main]
async fn main() {
    init_logging();
    install_panic_hook();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let store = ConfigStore::new(CONFIG_PATH.clone());

    let result = match args.split_first() {
        Some((command, rest)) => match command.as_str() {
            "setup" => cmd_setup(&store, rest).await,
            "link" => cmd_link(&store, rest).await,
            "status" => {
                cmd_status(&store);
                Ok(())
            }
            "share" => cmd_share(&store, rest).await,
            "share-image" => cmd_share_image(&store, rest).await,
            "clear" => cmd_clear(&store),
            _ => {
                usage();
                std::process::exit(2);
            }
        },
        None => {
            usage();
            std::process::exit(2);
        }
    };

    if let Err(e) = result {
        match e {
            ShareError::Abandoned => {
                println!("Share cancelled.");
            }
            other => {
                eprintln!("Error: {}", other);
                std::process::exit(1);
            }
        }
    }
}
