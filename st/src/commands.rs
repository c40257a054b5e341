//! CLI command implementations.

use std::path::PathBuf;
use std::time::Instant;

use log::{debug, info, warn};
use orbit::credentials::{self, check_passphrase, check_password, generate_passphrase};
use orbit::query::OperandValidator;
use orbit::{
    parse_rows, Config, Credentials, Error, Format, Limit, OrderBy, PersistMode, Persister,
    Predicate, Registry, RequestClass, Sort, SpaceRequest, SpaceTrackClient,
};

use crate::prompts::{prompt_input, prompt_secret};

/// Options shared by every command that fetches records.
pub struct FetchOptions {
    /// Format of the persisted files; falls back to the configured one.
    pub format: Option<Format>,
    pub per_row: bool,
    pub dry_run: bool,
}

/// Fetch general perturbations element sets.
pub fn gp(
    config: &mut Config,
    filters: &[String],
    order_by: OrderBy,
    limit: Limit,
    opts: &FetchOptions,
) -> orbit::Result<()> {
    let registry = Registry::global();
    for raw in filters {
        registry.check(raw)?;
    }
    let predicates = Predicate::parse_all(filters)?;

    let request = SpaceRequest::new(RequestClass::Gp)
        .with_predicates(predicates)
        .with_limit(limit)
        .with_order_by(order_by.clone());
    if request.order_by_path().is_empty() {
        warn!("ignoring orderby {:?}: not a sortable gp field", order_by.by);
    }

    execute(config, request, opts)
}

/// Fetch decay messages from the last `days` days.
pub fn decay(config: &mut Config, days: u32, limit: i64, opts: &FetchOptions) -> orbit::Result<()> {
    let request = SpaceRequest::new(RequestClass::Decay)
        .with_predicates(vec![Predicate::new("DECAY_EPOCH", format!(">now-{}", days))])
        .with_limit(Limit::new(limit, 0))
        .with_order_by(OrderBy::new("NORAD_CAT_ID", Sort::Asc));
    execute(config, request, opts)
}

/// Fetch public conjunction data messages created in the last `days` days.
pub fn cdm(config: &mut Config, days: u32, limit: i64, opts: &FetchOptions) -> orbit::Result<()> {
    let request = SpaceRequest::new(RequestClass::CdmPublic)
        .with_predicates(vec![Predicate::new("CREATED", format!(">now-{}", days))])
        .with_limit(Limit::new(limit, 0))
        .with_order_by(OrderBy::new("CDM_ID", Sort::Asc));
    execute(config, request, opts)
}

fn execute(config: &mut Config, request: SpaceRequest, opts: &FetchOptions) -> orbit::Result<()> {
    if opts.dry_run {
        println!("{}", request.path());
        return Ok(());
    }

    let credentials = load_credentials(config)?;
    let client = SpaceTrackClient::new()?;

    let started = Instant::now();
    let fetched = client.fetch(&request, &credentials, config.auth.session.clone())?;
    info!(
        "fetched {} in {} ms",
        request.class,
        started.elapsed().as_millis()
    );

    if fetched.refreshed {
        config.auth.session = Some(fetched.session);
        config.save()?;
        debug!("saved session cookie to {}", config.path.display());
    }

    let rows = parse_rows(request.class, &fetched.body)?;
    let format = opts.format.unwrap_or(config.format);
    let mode = if opts.per_row {
        PersistMode::PerRow
    } else {
        config.persist_mode
    };

    let written = Persister::new(&config.work_dir, mode, format).persist(request.class, &rows)?;
    println!(
        "Saved {} {} records to {} ({} files)",
        rows.len(),
        request.class,
        config.work_dir.display(),
        written.len()
    );
    Ok(())
}

fn load_credentials(config: &Config) -> orbit::Result<Credentials> {
    let auth = &config.auth;
    if !auth.has_credentials() {
        return Err(Error::Credentials(
            "no credentials configured, run `spacetrack credentials` first".to_string(),
        ));
    }

    if !auth.sealed {
        return Ok(Credentials {
            identity: auth.identity.clone(),
            password: auth.password.clone(),
        });
    }

    let secret_file = config.secret_file.as_ref().ok_or_else(|| {
        Error::Credentials("credentials are sealed but no secret file is configured".to_string())
    })?;
    let passphrase = credentials::read_passphrase_file(secret_file)?;

    Ok(Credentials {
        identity: credentials::open(&passphrase, &auth.identity)?,
        password: credentials::open(&passphrase, &auth.password)?,
    })
}

fn default_secret_file(config: &Config) -> PathBuf {
    config.path.with_file_name("secret")
}

/// Seal and store account credentials.
pub fn credentials(
    config: &mut Config,
    identity: Option<String>,
    password: Option<String>,
    passphrase: Option<String>,
    auto_passphrase: bool,
) -> orbit::Result<()> {
    let identity = prompt_input("space-track identity (user name or email)", identity)?;
    if identity.trim().is_empty() {
        return Err(Error::Credentials("identity must not be empty".to_string()));
    }

    let password = prompt_secret("space-track password", password, true)?;
    check_password(&password)?;

    let secret_file = config
        .secret_file
        .clone()
        .unwrap_or_else(|| default_secret_file(config));

    let passphrase = if auto_passphrase {
        info!("generating a passphrase");
        generate_passphrase()
    } else if let Some(passphrase) = passphrase {
        passphrase
    } else if secret_file.exists() {
        debug!("reusing passphrase from {}", secret_file.display());
        credentials::read_passphrase_file(&secret_file)?
    } else {
        prompt_secret("Passphrase (32 characters)", None, true)?
    };
    check_passphrase(&passphrase)?;

    credentials::write_passphrase_file(&secret_file, &passphrase)?;

    config.auth.identity = credentials::seal(&passphrase, identity.trim())?;
    config.auth.password = credentials::seal(&passphrase, &password)?;
    config.auth.sealed = true;
    config.auth.session = None;
    config.secret_file = Some(secret_file.clone());
    config.save()?;

    println!("Credentials saved to {}", config.path.display());
    println!("Passphrase stored in {}", secret_file.display());
    Ok(())
}

/// List every field usable with `gp --filter`.
pub fn fields() -> orbit::Result<()> {
    let registry = Registry::global();
    let names = registry.fields();
    let width = names.iter().map(|n| n.len()).max().unwrap_or(0);

    for name in names {
        let summary = match registry.lookup(name).map(|rule| &rule.validator) {
            Some(OperandValidator::ExactMatch(v)) => format!("One of {}", v.values().join(", ")),
            _ => registry.help_for(name).lines().next().unwrap_or_default().to_string(),
        };
        println!("{:<width$}  {}", name, summary, width = width);
    }
    Ok(())
}
