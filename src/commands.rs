use crate::{emit_success, OutputMode};
use anyhow::Context;
use dxcatalog::adapter::collections;
use dxcatalog::config::{ensure_data_dir, write_config, CatalogConfig};
use dxcatalog::repository::SearchOptions;
use dxcatalog::ui::{self, Icons};
use dxcatalog::{Category, DataAdapter, Dal, FindManyArgs, OrderSpec, Selection, Where};
use serde_json::Value;
use std::path::Path;

/// Raw `find` arguments as typed on the command line
pub struct FindQuery {
    pub filter: Option<String>,
    pub order_by: Option<String>,
    pub skip: Option<usize>,
    pub take: Option<usize>,
    pub select: Vec<String>,
}

impl FindQuery {
    fn to_args(&self) -> anyhow::Result<FindManyArgs> {
        let mut args = FindManyArgs::new();
        if let Some(filter) = &self.filter {
            let json: Value = serde_json::from_str(filter).context("--where is not valid JSON")?;
            args = args.filter(Where::from_json(&json)?);
        }
        if let Some(order) = &self.order_by {
            args = args.order_by(OrderSpec::parse(order)?);
        }
        args.skip = self.skip;
        args.take = self.take;
        Ok(args)
    }
}

pub fn run_init(mode: OutputMode, config_path: &Path, force: bool) -> anyhow::Result<()> {
    let config = CatalogConfig::default();
    write_config(config_path, &config, force)?;

    let mut data = config.data.clone();
    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        data.dir = parent.join(&data.dir);
    }
    ensure_data_dir(&data)?;

    if mode.is_human() {
        ui::success(&format!("Wrote {}", config_path.display()));
        ui::info("Data directory", &data.dir.display().to_string());
    } else {
        let payload = serde_json::json!({
            "config": config_path,
            "dataDir": data.dir,
        });
        emit_success(mode, "init", payload)?;
    }
    Ok(())
}

pub async fn run_stats(mode: OutputMode, dal: &Dal) -> anyhow::Result<()> {
    let stats = dal.tests().get_stats().await?;
    let mut sizes = serde_json::Map::new();
    for name in collections::ALL {
        sizes.insert(name.to_string(), dal.adapter().len(name)?.into());
    }

    if !mode.is_human() {
        let payload = serde_json::json!({ "tests": stats, "collections": sizes });
        return emit_success(mode, "stats", payload);
    }

    ui::header(&format!("{} Catalog statistics", ui::icon(Icons::STATS)));
    let total = stats.total_tests.to_string();
    let vendors = stats.vendor_count.to_string();
    let cancers = stats.cancer_type_count.to_string();
    let verified = stats.verified_test_count.to_string();
    let fda = stats.fda_approved_count.to_string();
    println!(
        "{}",
        ui::stats_table(&[
            ("Tests", total.as_str()),
            ("Vendors", vendors.as_str()),
            ("Cancer types", cancers.as_str()),
            ("Vendor-verified tests", verified.as_str()),
            ("FDA approved", fda.as_str()),
        ])
    );

    ui::section("By category");
    for category in Category::all() {
        let count = stats.by_category.get(category.code()).copied().unwrap_or(0);
        ui::summary_row(
            &format!("{} {}", ui::category(category.code()), category.display_name()),
            &count.to_string(),
        );
    }

    ui::section("Collections");
    for (name, size) in &sizes {
        ui::summary_row(name, &size.to_string());
    }
    Ok(())
}

pub async fn run_find(
    mode: OutputMode,
    dal: &Dal,
    collection: &str,
    query: &FindQuery,
) -> anyhow::Result<()> {
    let args = query.to_args()?;
    let result = if query.select.is_empty() {
        dal.adapter().find_many_json(collection, &args)?
    } else {
        let selection = Selection::fields(query.select.iter().cloned());
        dal.adapter()
            .find_many_selected(collection, &args, &selection)
            .await?
            .map(Value::Object)
    };

    if !mode.is_human() {
        return emit_success(mode, "find", result);
    }

    ui::header(&format!("{} {}", ui::icon(Icons::SEARCH), collection));
    for record in &result.data {
        println!("{}", serde_json::to_string_pretty(record)?);
    }
    ui::page_summary(result.meta.returned, result.meta.total, result.meta.has_more);
    Ok(())
}

pub fn run_get(mode: OutputMode, dal: &Dal, collection: &str, id: &str) -> anyhow::Result<()> {
    let record = dal
        .adapter()
        .find_by_id_json(collection, id)?
        .with_context(|| format!("No record '{}' in {}", id, collection))?;

    if mode.is_human() {
        println!("{}", serde_json::to_string_pretty(&record)?);
        Ok(())
    } else {
        emit_success(mode, "get", record)
    }
}

pub async fn run_slug(
    mode: OutputMode,
    dal: &Dal,
    slug: &str,
    category: Option<&str>,
) -> anyhow::Result<()> {
    let category = category.map(str::parse::<Category>).transpose()?;
    let test = dal
        .tests()
        .find_by_slug(slug, category)
        .await?
        .with_context(|| format!("No test with slug '{}'", slug))?;

    if !mode.is_human() {
        return emit_success(mode, "slug", test);
    }

    ui::header(&format!("{} {}", ui::icon(Icons::CATALOG), test.name()));
    ui::status(Icons::VENDOR, "Vendor", test.vendor());
    ui::status(Icons::INFO, "Category", &ui::category(test.category.code()));
    ui::status(Icons::INFO, "ID", &test.id);
    ui::status(Icons::INFO, "URL", &format!("{}/{}", test.url_path, test.slug));
    if let Some(fda) = &test.details.fda_status {
        ui::status(Icons::SHIELD, "FDA status", fda);
    }
    if !test.details.cancer_types.is_empty() {
        ui::status(Icons::INFO, "Cancer types", &test.details.cancer_types.join(", "));
    }
    Ok(())
}

pub async fn run_search(
    mode: OutputMode,
    dal: &Dal,
    query: &str,
    take: Option<usize>,
) -> anyhow::Result<()> {
    let mut options = SearchOptions::new().order_by(OrderSpec::asc("name"));
    options.take = take;
    let result = dal.tests().search(query, &options).await?;

    if !mode.is_human() {
        return emit_success(mode, "search", result);
    }

    if result.is_empty() {
        ui::warn(&format!("No tests match '{}'", query));
        return Ok(());
    }
    ui::header(&format!("{} Tests matching '{}'", ui::icon(Icons::SEARCH), query));
    println!("{}", ui::tests_table(&result.data));
    ui::page_summary(result.meta.returned, result.meta.total, result.meta.has_more);
    Ok(())
}

pub async fn run_distinct(
    mode: OutputMode,
    dal: &Dal,
    collection: &str,
    field: &str,
) -> anyhow::Result<()> {
    let values = dal.adapter().distinct(collection, field, &Where::new()).await?;

    if !mode.is_human() {
        return emit_success(mode, "distinct", values);
    }
    ui::header(&format!("{}.{} ({} values)", collection, field, values.len()));
    for value in &values {
        println!("  {}", value);
    }
    Ok(())
}

pub async fn run_count_by(
    mode: OutputMode,
    dal: &Dal,
    collection: &str,
    field: &str,
) -> anyhow::Result<()> {
    let counts = dal.adapter().count_by(collection, field, &Where::new()).await?;

    if !mode.is_human() {
        return emit_success(mode, "count-by", counts);
    }
    ui::header(&format!("{} {} by {}", ui::icon(Icons::STATS), collection, field));
    let mut table = ui::TableBuilder::new();
    for (value, count) in &counts {
        table.add_row(value, &count.to_string());
    }
    println!("{}", table.build());
    Ok(())
}

pub async fn run_vendors(
    mode: OutputMode,
    dal: &Dal,
    verified: bool,
    assistance: bool,
) -> anyhow::Result<()> {
    let vendors = dal.vendors();
    let mut list = if verified {
        vendors.find_with_verified_tests().await?
    } else if assistance {
        vendors.find_with_assistance_programs().await?
    } else {
        vendors.find_all(&FindManyArgs::new()).await?.data
    };
    if verified && assistance {
        list.retain(|v| v.has_assistance_program);
    }

    if !mode.is_human() {
        return emit_success(mode, "vendors", list);
    }
    if list.is_empty() {
        ui::warn("No vendors match");
        return Ok(());
    }
    ui::header(&format!("{} {} vendors", ui::icon(Icons::VENDOR), list.len()));
    println!("{}", ui::vendors_table(&list));
    Ok(())
}

pub async fn run_coverage(
    mode: OutputMode,
    dal: &Dal,
    test_id: &str,
    payer: &str,
) -> anyhow::Result<()> {
    let coverage = dal
        .insurance()
        .get_coverage_by_test_id(test_id, payer)
        .await?
        .with_context(|| format!("No test with id '{}'", test_id))?;

    if !mode.is_human() {
        return emit_success(mode, "coverage", coverage);
    }

    ui::header(&format!("{} Coverage of {}", ui::icon(Icons::SHIELD), test_id));
    let payer_label = match &coverage.payer_id {
        Some(id) => format!("{} ({})", payer, id),
        None => format!("{} {}", payer, ui::muted("(unresolved payer)")),
    };
    ui::coverage(&payer_label, coverage.status);
    ui::summary_row("Decided by", &format!("{:?}", coverage.source));
    if let Some(policy) = coverage.policy.as_ref().and_then(|p| p.policy.as_deref()) {
        ui::summary_row("Policy", policy);
    }
    Ok(())
}

pub async fn run_changelog(mode: OutputMode, dal: &Dal, recent: Option<usize>) -> anyhow::Result<()> {
    let entries = match recent {
        Some(n) => dal.changelog().find_recent(n).await?,
        None => dal.changelog().find_all(&FindManyArgs::new()).await?.data,
    };

    if !mode.is_human() {
        return emit_success(mode, "changelog", entries);
    }
    ui::header(&format!("{} Changelog", ui::icon(Icons::CLOCK)));
    for entry in &entries {
        let subject = entry.test_name.as_deref().or(entry.test_id.as_deref()).unwrap_or("");
        println!(
            "  {} {} {} {}",
            ui::dim(&entry.date),
            ui::muted(&format!("[{}]", entry.kind)),
            subject,
            entry.description
        );
    }
    Ok(())
}

pub async fn run_glossary(mode: OutputMode, dal: &Dal, query: Option<&str>) -> anyhow::Result<()> {
    let terms = match query {
        Some(q) => dal.glossary().search(q).await?.data,
        None => dal.glossary().find_all().await?,
    };

    if !mode.is_human() {
        return emit_success(mode, "glossary", terms);
    }
    ui::header(&format!("{} Glossary", ui::icon(Icons::BOOK)));
    for term in &terms {
        println!("  {}", term.term);
        println!("    {}", ui::dim(&term.definition));
    }
    Ok(())
}
