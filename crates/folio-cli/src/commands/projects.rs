//! Project gallery command

use crate::app::{OutputFormat, ProjectArgs, ProjectSortArg};
use crate::output::format_search_response;
use anyhow::Result;
use folio_core::{
    initialize_search, search_projects, Config, Database, ProjectSearchOptions, ProjectSort,
};

pub async fn run(
    args: ProjectArgs,
    db: &Database,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let query = args.query.join(" ");
    let ctx = initialize_search(config)?;

    let options = ProjectSearchOptions {
        page: args.page,
        limit: args.limit,
        sort: match args.sort {
            ProjectSortArg::Relevance => ProjectSort::Relevance,
            ProjectSortArg::Recent => ProjectSort::Recent,
            ProjectSortArg::Featured => ProjectSort::Featured,
            ProjectSortArg::Name => ProjectSort::Name,
            ProjectSortArg::Random => ProjectSort::Random,
        },
        threshold: args.threshold,
        enable_reranking: args.rerank,
    };

    let response = search_projects(db, &query, &options, &ctx).await;
    print!("{}", format_search_response(&response, format)?);
    Ok(())
}
