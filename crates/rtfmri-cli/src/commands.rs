use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Write};

use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;
use tracing::{debug, info, info_span};

use rtfmri_cli::config::Settings;
use rtfmri_cli::session::{HELP, Session, Step};
use rtfmri_core::{CrossFilterView, Explorer};
use rtfmri_ingest::{DroppedColumn, load_dataset};
use rtfmri_model::{CategoryIndex, FieldCatalog, StudyRecord};
use rtfmri_submit::{
    FormOptions, SubmissionForm, SubmitError, export_csv, export_data_uri, methods_sentences,
    write_export,
};

use crate::cli::{BrowseArgs, Cli, ExploreArgs, SubmitArgs, VisualizeArgs};
use crate::summary::{print_browse, print_fields, print_submission, print_view};
use crate::types::{FieldSummary, FieldsReport, SubmissionResult};

/// Everything a command needs, loaded once at startup.
pub struct AppContext {
    pub settings: Settings,
    pub dropped: Vec<DroppedColumn>,
    pub explorer: Explorer,
    pub json: bool,
}

pub fn load_context(cli: &Cli) -> Result<AppContext> {
    let settings = Settings::load(cli.dataset.as_deref(), cli.config.as_deref())
        .context("load settings")?;
    let span = info_span!("load", dataset = %settings.dataset.display());
    let _guard = span.enter();
    debug!(?settings, "resolved settings");

    let loaded = load_dataset(&settings.dataset)
        .with_context(|| format!("load dataset {}", settings.dataset.display()))?;
    let explorer = Explorer::new(loaded.dataset)
        .context("index dataset")?
        .with_max_rows(settings.max_rows);
    info!(
        studies = explorer.dataset().len(),
        plot_fields = explorer.plot_catalog().len(),
        "explorer ready"
    );
    Ok(AppContext {
        settings,
        dropped: loaded.dropped,
        explorer,
        json: cli.json,
    })
}

pub fn run_fields(ctx: &AppContext) -> Result<()> {
    let fields = ctx
        .explorer
        .plot_catalog()
        .entries()
        .iter()
        .map(|entry| {
            let top = ctx
                .explorer
                .index(&entry.field)
                .and_then(|index| index.entries().first());
            FieldSummary {
                field: entry.field.clone(),
                label: entry.label.clone(),
                distinct: ctx.explorer.index(&entry.field).map_or(0, CategoryIndex::len),
                top_value: top.map(|count| count.value.clone()),
                top_count: top.map_or(0, |count| count.count),
            }
        })
        .collect();
    let report = FieldsReport {
        dataset: ctx.settings.dataset.clone(),
        studies: ctx.explorer.dataset().len(),
        fields,
        dropped: ctx.dropped.clone(),
    };
    if ctx.json {
        print_json(&report)
    } else {
        print_fields(&report);
        Ok(())
    }
}

pub fn run_browse(ctx: &AppContext, args: &BrowseArgs) -> Result<()> {
    let (records, matched) = browse_records(ctx, args);
    if ctx.json {
        print_json(&records)
    } else {
        print_browse(
            &records,
            matched,
            ctx.explorer.column_catalog(),
            ctx.explorer.dataset(),
        );
        Ok(())
    }
}

/// Matching records after the limit, and how many matched before it.
fn browse_records<'a>(ctx: &'a AppContext, args: &BrowseArgs) -> (Vec<&'a StudyRecord>, usize) {
    let mut records = ctx.explorer.search(&args.query);
    let matched = records.len();
    if let Some(limit) = args.limit.or(ctx.settings.browse_limit) {
        records.truncate(limit);
    }
    debug!(query = %args.query, matched, shown = records.len(), "browse");
    (records, matched)
}

pub fn run_visualize(ctx: &AppContext, args: &VisualizeArgs) -> Result<()> {
    let view = build_view(ctx, args)?;
    if ctx.json {
        print_json(&view.snapshot())
    } else {
        print_view(&view, ctx.explorer.column_catalog());
        Ok(())
    }
}

/// Applies the visualize flags in order, rejecting values the primary field lacks.
fn build_view(ctx: &AppContext, args: &VisualizeArgs) -> Result<CrossFilterView> {
    let mut view = open_configured_view(ctx)?;
    if let Some(max_rows) = args.max_rows {
        view = view.with_max_rows(max_rows);
    }
    if let Some(field) = &args.primary {
        view.change_primary(field)
            .with_context(|| format!("select primary field {field}"))?;
    }
    if let Some(field) = &args.secondary {
        view.change_secondary(field)
            .with_context(|| format!("select secondary field {field}"))?;
    }
    if let Some(value) = &args.hover {
        view.hover(Some(value.as_str()))?;
        ensure_active(&view, value, view.selection().active_primary_value())?;
    }
    if let Some(value) = &args.click {
        view.click(Some(value.as_str()))?;
        ensure_active(&view, value, view.selection().active_click_value())?;
    }
    Ok(view)
}

/// Runs an explore session and returns the number of rejected lines.
pub fn run_explore(ctx: &AppContext, args: &ExploreArgs) -> Result<usize> {
    let interactive = args.script.is_none() && io::stdin().is_terminal();
    let reader: Box<dyn BufRead> = match &args.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("open script {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let mut session = Session::new(open_configured_view(ctx)?);
    let mut errors = 0usize;
    let mut shown = false;
    if interactive {
        eprintln!("{HELP}");
        prompt()?;
    }
    for (number, line) in reader.lines().enumerate() {
        let line = line.context("read session input")?;
        match session.handle_line(&line) {
            Ok(Step::Quit) => break,
            Ok(Step::Show) => {
                show(ctx, session.view())?;
                shown = true;
            }
            Ok(Step::Help) => println!("{HELP}"),
            Ok(Step::Applied) => shown = false,
            Ok(Step::Skip) => {}
            Err(error) => {
                errors += 1;
                eprintln!("error: line {}: {error}", number + 1);
            }
        }
        if interactive {
            prompt()?;
        }
    }
    if !shown {
        show(ctx, session.view())?;
    }
    info!(events = session.applied(), errors, "session finished");
    Ok(errors)
}

pub fn run_submit(ctx: &AppContext, args: &SubmitArgs) -> Result<()> {
    let result = build_submission(ctx, args)?;
    if ctx.json {
        print_json(&result)
    } else {
        print_submission(&result);
        Ok(())
    }
}

fn build_submission(ctx: &AppContext, args: &SubmitArgs) -> Result<SubmissionResult> {
    let catalog = FieldCatalog::plot();
    let options =
        FormOptions::from_dataset(ctx.explorer.dataset(), &catalog).map_err(submit_error)?;

    let mut form = SubmissionForm::default();
    form.author = args.author.clone();
    form.doi = args.doi.clone();
    form.article_title = args.title.clone();
    for (field, value) in &args.set {
        form.select(field, value).map_err(submit_error)?;
    }
    form.validate(&options).map_err(submit_error)?;

    let csv = export_csv(&form, &catalog).map_err(submit_error)?;
    let data_uri = match &args.output {
        Some(path) => {
            write_export(&form, &catalog, path).map_err(submit_error)?;
            None
        }
        None => Some(export_data_uri(&form, &catalog).map_err(submit_error)?),
    };
    Ok(SubmissionResult {
        csv,
        data_uri,
        output: args.output.clone(),
        sentences: methods_sentences(&form, &catalog),
    })
}

/// Opens a view and applies the configured initial fields.
fn open_configured_view(ctx: &AppContext) -> Result<CrossFilterView> {
    let mut view = ctx.explorer.open_view().context("open view")?;
    if let Some(field) = &ctx.settings.primary {
        view.change_primary(field)
            .with_context(|| format!("config [view] primary = {field}"))?;
    }
    if let Some(field) = &ctx.settings.secondary {
        view.change_secondary(field)
            .with_context(|| format!("config [view] secondary = {field}"))?;
    }
    Ok(view)
}

fn ensure_active(view: &CrossFilterView, requested: &str, active: Option<&str>) -> Result<()> {
    if active.is_none() {
        bail!(
            "'{requested}' is not a value of {}",
            view.selection().primary_field()
        );
    }
    Ok(())
}

fn show(ctx: &AppContext, view: &CrossFilterView) -> Result<()> {
    if ctx.json {
        let line = serde_json::to_string(&view.snapshot()).context("serialize view")?;
        println!("{line}");
    } else {
        print_view(view, ctx.explorer.column_catalog());
    }
    Ok(())
}

fn prompt() -> Result<()> {
    let mut stderr = io::stderr();
    write!(stderr, "> ")?;
    stderr.flush()?;
    Ok(())
}

fn submit_error(error: SubmitError) -> anyhow::Error {
    match error.suggestion() {
        Some(hint) => anyhow!("{error}\nhint: {hint}"),
        None => anyhow::Error::new(error),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{text}");
    Ok(())
}
