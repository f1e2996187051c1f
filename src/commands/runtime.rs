use crate::*;
use std::net::ToSocketAddrs;
use std::sync::Arc;

pub fn handle_runtime_commands(
    cli: &Cli,
    config: &Config,
    registry: Arc<Registry>,
    history: &HistorySetup,
) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Serve { host, port } => {
            let host = host.as_deref().unwrap_or(&config.server.host);
            let port = port.unwrap_or(config.server.port);
            let addr = (host, port)
                .to_socket_addrs()?
                .next()
                .ok_or_else(|| anyhow::anyhow!("cannot resolve listen address {host}:{port}"))?;
            let state = AppState {
                registry,
                history: history.recording(),
            };
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?
                .block_on(serve(addr, state))?;
        }
        Commands::Query { no_history, query } => {
            let full_query = query.join(" ");
            let mut ctx = RequestContext::local();
            let outcome = registry.execute_query(&full_query, &mut ctx);
            let recorded = match history.recording() {
                Some(store) if !no_history => store.record(&ctx)?,
                _ => false,
            };
            let report = query_report(&ctx, outcome, recorded);
            emit_one(cli.json, report, |r| match (&r.location, &r.body) {
                (Some(location), _) => format!("redirect {location}"),
                (None, Some(body)) => body.clone(),
                (None, None) => String::new(),
            })?;
        }
        Commands::List => {
            emit_one(cli.json, listing_entries(&registry), |_| {
                listing_lines(&registry, None).join("\n")
            })?;
        }
        Commands::History { .. } => return Ok(false),
    }
    Ok(true)
}

fn query_report(ctx: &RequestContext, outcome: Outcome, recorded: bool) -> QueryReport {
    let (kind, location, body) = match outcome {
        Outcome::Redirect(location) => ("redirect", Some(href(&location)), None),
        Outcome::Text(body) => ("text", None, Some(body)),
    };
    QueryReport {
        query: ctx.full_query.clone(),
        command: ctx.resolved_command_name.clone(),
        kind: kind.to_string(),
        location,
        body,
        recorded,
    }
}

fn listing_entries(registry: &Registry) -> Vec<ListingEntry> {
    let default = registry.default_descriptor().map(|d| d.name().to_string());
    registry
        .all_descriptors_with_aliases()
        .into_iter()
        .map(|(d, aliases)| ListingEntry {
            name: d.name().to_string(),
            resolving_aliases: registry.resolving_aliases(&d),
            aliases,
            description: d.description().to_string(),
            default: default.as_deref() == Some(d.name()),
            strategy: d.parse_strategy(),
            skip_first: d.skips_first(),
        })
        .collect()
}
