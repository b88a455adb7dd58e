//! Directory search command

use crate::app::{EntityKind, OutputFormat, SearchArgs, SortArg};
use crate::output::format_search_response;
use anyhow::Result;
use folio_core::{
    hybrid_search, initialize_search, Config, Database, EntityType, SearchOptions, SortOrder,
};

pub async fn run(
    args: SearchArgs,
    db: &Database,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let query = args.query.join(" ");
    let ctx = initialize_search(config)?;

    let options = SearchOptions {
        page: args.page,
        limit: args.limit,
        sort: match args.sort {
            SortArg::Relevance => SortOrder::Relevance,
            SortArg::Recent => SortOrder::Recent,
            SortArg::Name => SortOrder::Name,
        },
        entity_types: match args.kind {
            EntityKind::All => vec![EntityType::Profile, EntityType::Project],
            EntityKind::Profiles => vec![EntityType::Profile],
            EntityKind::Projects => vec![EntityType::Project],
        },
        enable_reranking: args.rerank,
        threshold: args.threshold,
        ..Default::default()
    };

    let response = hybrid_search(db, &query, &options, &ctx).await;
    print!("{}", format_search_response(&response, format)?);
    Ok(())
}
