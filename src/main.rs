//! Rocketseat Downloader - CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use rocketseat_downloader::{
    api::{CatalogItem, SessionStore, SkylabApi},
    cli::{prompt_credentials, Args, Selector},
    config::{validate_config, Config, SyncScope},
    content::ModuleNode,
    deps::{check_dependencies, install_hint, REQUIRED_TOOLS},
    download::{CourseDownloader, MediaFetcher},
    error::{exit_codes, Error, Result},
    output::{
        create_spinner, print_banner, print_config_summary, print_error, print_info,
        print_item_summary, print_missing_tools, print_run_summary, print_success, print_warning,
    },
    sync::SyncBridge,
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(0) => ExitCode::from(exit_codes::SUCCESS as u8),
        Ok(_) => ExitCode::from(exit_codes::SOME_ITEMS_FAILED as u8),
        Err(e) => {
            match &e {
                Error::MissingDependencies(missing) => print_missing_tools(missing, install_hint),
                _ => print_error(&format!("{}", e)),
            }
            let code = match e {
                Error::Config(_)
                | Error::ConfigValidation { .. }
                | Error::MissingConfig(_)
                | Error::TomlParse(_) => exit_codes::CONFIG_ERROR,
                Error::Authentication(_)
                | Error::Api(_)
                | Error::Status { .. }
                | Error::Http(_)
                | Error::Session { .. } => exit_codes::API_ERROR,
                Error::Download(_) => exit_codes::DOWNLOAD_ERROR,
                Error::MissingDependencies(_) => exit_codes::MISSING_DEPENDENCIES,
                Error::Selection(_) => exit_codes::ABORT,
                _ => exit_codes::UNEXPECTED_ERROR,
            };
            ExitCode::from(code as u8)
        }
    }
}

/// Run the whole session. Returns the number of items that failed.
async fn run() -> Result<usize> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    // External tools come first, nothing works without them
    check_dependencies(REQUIRED_TOOLS)?;

    // Load configuration
    let config_path = args.config.clone();
    let mut config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        print_info(&format!(
            "No configuration file at {}, using defaults and CLI arguments",
            config_path.display()
        ));
        Config::default()
    };

    let answers = args.pre_answers();
    args.merge_into_config(&mut config);
    validate_config(&config)?;

    let sync = SyncBridge::new(config.sync.clone());
    let sync_target = sync.is_enabled().then(|| sync.target(None));
    print_config_summary(
        &config.output.root.display().to_string(),
        &config.session_path().display().to_string(),
        sync_target.as_deref(),
    );

    let api = connect(&config).await?;

    // Catalog
    let spinner = create_spinner("Fetching catalog...");
    let catalog = api.list_catalog().await;
    spinner.finish_and_clear();
    let catalog = catalog?;

    if catalog.is_empty() {
        print_warning("The catalog is empty, nothing to download");
        return Ok(0);
    }

    let labels: Vec<String> = catalog
        .iter()
        .map(|item| format!("{} ({})", item.title, item.kind))
        .collect();
    let items = Selector::new(answers.all, answers.items.clone())
        .select("Choose what to download:", &labels)?;

    // Download
    let fetcher = MediaFetcher::new(config.media.clone());
    let downloader = CourseDownloader::new(&api, &api, &fetcher, &config.output);
    let module_selector = Selector::new(answers.all, answers.modules.clone());

    let mut done_folders: Vec<PathBuf> = Vec::new();
    let mut failed = 0;

    for item in items.iter().filter_map(|&i| catalog.get(i)) {
        print_info(&format!("Downloading {}: {}", item.kind, item.title));

        match download_one(&downloader, &module_selector, item).await {
            Ok(folder) => done_folders.push(folder),
            Err(e) => {
                print_error(&format!("Failed to download {}: {}", item.title, e));
                failed += 1;
            }
        }
    }

    // Mirror
    if sync.is_enabled() {
        match config.sync.scope {
            SyncScope::All => sync.sync(&config.output.root, None).await,
            SyncScope::Item => {
                for folder in &done_folders {
                    let name = folder
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned());
                    sync.sync(folder, name.as_deref()).await;
                }
            }
        }
    }

    print_run_summary(done_folders.len(), failed);
    Ok(failed)
}

/// Restore the stored session, or log in and store a new one.
async fn connect(config: &Config) -> Result<SkylabApi> {
    let store = SessionStore::new(config.session_path());
    let timeout = config.http_timeout();

    if let Some(session) = store.load()? {
        print_info(&format!("Loaded saved session from {}", store.path().display()));
        let api = SkylabApi::new(&config.http, timeout, session)?;

        match api.get_account().await {
            Ok(account) => print_success(&format!("Welcome back, {}", account.name)),
            Err(e) => print_warning(&format!("Could not fetch account details: {}", e)),
        }
        return Ok(api);
    }

    let (email, password) =
        prompt_credentials(config.account.email.clone(), config.account.password.clone())?;

    let mut api = SkylabApi::unauthenticated(&config.http, timeout)?;
    let spinner = create_spinner("Logging in...");
    let account = api.login(&email, &password).await;
    spinner.finish_and_clear();
    let account = account?;

    store.save(api.session())?;
    print_success(&format!("Logged in as {}", account.name));
    tracing::debug!("Session saved to {}", store.path().display());

    Ok(api)
}

/// Download one catalog item, asking which modules to include.
async fn download_one(
    downloader: &CourseDownloader<'_>,
    selector: &Selector,
    item: &CatalogItem,
) -> Result<PathBuf> {
    let summary = downloader
        .download_item(item, |modules: &[ModuleNode]| {
            let labels: Vec<String> = modules
                .iter()
                .map(|m| format!("{} ({})", m.title, m.course_title()))
                .collect();
            selector.select("Choose the modules to download:", &labels)
        })
        .await?;

    print_item_summary(&summary);
    Ok(summary.folder)
}
