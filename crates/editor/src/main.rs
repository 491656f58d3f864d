//! `pressroom-offers`: apply type selections to a scratch version and print
//! what each offer block would render.
//!
//! Usage: `pressroom-offers <type-table.json> <type_id[:shortcode]>...`
//! (the table argument is dropped when `PRESSROOM_TYPE_TABLE` is set).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use pressroom_catalog::{TypeCatalog, TypeTable};
use pressroom_core::{ArticleId, VersionId};
use pressroom_editor::blocks::{self, BlockKind, BlockRender};
use pressroom_editor::{
    Classification, EditorConfig, OfferStore, OfferStoreHandle, OfferView, SelectionOutcome,
    TypeSelector, VersionEntity, VersionRecord,
};
use serde::Serialize;

#[derive(Serialize)]
struct Report<'a> {
    classification: String,
    type_name: String,
    blocks: Vec<(BlockKind, BlockRender)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<&'a str>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    pressroom_observability::init();

    let config = EditorConfig::from_env()?;
    let mut args = std::env::args().skip(1);

    let table_path = match config.type_table_path.clone() {
        Some(path) => path,
        None => PathBuf::from(args.next().context(
            "usage: pressroom-offers <type-table.json> <type_id[:shortcode]>...",
        )?),
    };
    let selections = args
        .map(|raw| {
            raw.parse::<Classification>()
                .with_context(|| format!("invalid selection {raw:?}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    let Some((first, rest)) = selections.split_first() else {
        bail!("at least one type selection is required");
    };

    let table = TypeTable::from_path(&table_path)
        .with_context(|| format!("loading type table {}", table_path.display()))?;
    tracing::info!(path = %table_path.display(), types = table.len(), "type table loaded");
    let types: Arc<dyn TypeCatalog> = Arc::new(table);

    let selector = TypeSelector::new(Arc::clone(&types));
    let version = selector.load(VersionRecord::new(
        VersionId::new(),
        ArticleId::new(),
        "Scratch article",
        first.type_id.clone(),
        first.type_id.as_str(),
        first.shortcode.clone(),
    ));

    let store = OfferStore::new(types, Arc::new(config.fetcher()), config.offers.clone())
        .attach(&version);
    let settle_within = config.offers.fetch_timeout + Duration::from_secs(1);

    print_report(&version, &store, first, config.block_limit, settle_within, None).await?;

    for selection in rest {
        let warning = match selector.select(&version, selection.clone()) {
            SelectionOutcome::Resolved { .. } => None,
            SelectionOutcome::UnknownType { .. } => Some("type missing from table"),
        };
        print_report(&version, &store, selection, config.block_limit, settle_within, warning).await?;
    }

    store.detach().await;
    Ok(())
}

async fn print_report(
    version: &VersionEntity,
    store: &OfferStoreHandle,
    selection: &Classification,
    limit: usize,
    settle_within: Duration,
    warning: Option<&str>,
) -> anyhow::Result<()> {
    settle(store.view(), selection, settle_within).await;

    let report = Report {
        classification: selection.to_string(),
        type_name: version.type_name(),
        blocks: blocks::for_version(store, limit)
            .iter()
            .map(|block| (block.kind(), block.render()))
            .collect(),
        warning,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Wait until the store has caught up with `selection` and is not fetching.
async fn settle(mut view: OfferView, selection: &Classification, within: Duration) {
    let settled = tokio::time::timeout(
        within,
        view.wait_for(|state| state.classification() == selection && !state.loading()),
    )
    .await;

    match settled {
        Ok(Some(_)) => {}
        Ok(None) => tracing::warn!("offer store closed before settling"),
        Err(_) => tracing::warn!(classification = %selection, "offer store did not settle in time"),
    }
}
