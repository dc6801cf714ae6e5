use std::io::{self, IsTerminal};

use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use log::{debug, info};
use tabchart::chart_export::{write_figure_png, ExportOptions};
use tabchart::cli::{parse_size, Args};
use tabchart::error_display::user_message_from_report;
use tabchart::source::DataFrameCursor;
use tabchart::widgets::{render_to_buffer, write_buffer};
use tabchart::{
    render_example, AppConfig, ColorDepth, ConfigManager, Display, RenderDispatcher,
    StrategyKind, Theme, APP_NAME,
};

const EXAMPLE_PREVIEW_SIZE: (u16, u16) = (72, 16);

fn handle_early_exit_flags(args: &Args) -> Result<Option<()>> {
    if args.generate_config {
        let config = ConfigManager::new(APP_NAME)?;
        let path = config.write_default_config(args.force)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(Some(()));
    }

    if args.list {
        print!("{}", tabchart::strategy_listing());
        return Ok(Some(()));
    }

    if let Some(arg) = args.explain {
        let kind = StrategyKind::from(arg);
        print!("{}", kind.strategy().format_explanation_rich());
        return Ok(Some(()));
    }

    if let Some(arg) = args.examples {
        let kind = StrategyKind::from(arg);
        let config = AppConfig::load(APP_NAME)?;
        let theme = Theme::from_config(&config.theme)?;
        let depth = terminal_depth();
        let mut out = io::stdout().lock();
        let examples = kind.strategy().examples();
        if examples.is_empty() {
            println!("{} has no examples.", kind.title());
        }
        for example in examples {
            println!("## {}\n\n{}\n\n{}\n", example.name, example.description, example.query);
            let buf = render_example(kind, &example, &theme, EXAMPLE_PREVIEW_SIZE, depth);
            write_buffer(&buf, &mut out, depth != ColorDepth::Monochrome)?;
            println!();
        }
        return Ok(Some(()));
    }

    Ok(None)
}

/// Color depth for stdout; piped output is always plain.
fn terminal_depth() -> ColorDepth {
    if io::stdout().is_terminal() {
        ColorDepth::detect()
    } else {
        ColorDepth::Monochrome
    }
}

fn run(args: &Args) -> Result<()> {
    let mut config = AppConfig::load(APP_NAME)?;
    if args.row_limit.is_some() {
        config.chart.row_limit = args.row_limit;
    }
    if args.unrestricted {
        config.chart.render_unrestricted = true;
    }
    let path = args
        .path
        .as_deref()
        .ok_or_else(|| eyre!("A data file is required"))?;

    let kind = StrategyKind::from(args.strategy);
    let mut dispatcher = RenderDispatcher::from_config(kind, &config)?;
    dispatcher.set_transpose(args.transpose);
    let cursor = DataFrameCursor::from_path(path, args.format, !args.no_header)
        .map_err(|e| eyre!("{}", user_message_from_report(&e, Some(path))))?;
    dispatcher.set_result(Box::new(cursor));
    debug!("rendered {} for {}", kind, path.display());

    let Some(output) = &args.output else {
        let size = parse_size(&args.preview_size)
            .ok_or_else(|| eyre!("Invalid --preview-size '{}'. Use WIDTHxHEIGHT.", args.preview_size))?;
        let depth = terminal_depth();
        let buf = render_to_buffer(dispatcher.display(), size, depth);
        write_buffer(&buf, &mut io::stdout().lock(), depth != ColorDepth::Monochrome)?;
        return Ok(());
    };

    let mut options = ExportOptions::from_config(&config.export);
    options.width = args.width.unwrap_or(options.width);
    options.height = args.height.unwrap_or(options.height);
    options.watermark |= args.watermark;

    match dispatcher.display() {
        Display::Chart(figure) => {
            write_figure_png(output, figure, options.size(), options.watermark)?;
            info!("exported {} to {}", kind, output.display());
            println!("Wrote {}", output.display());
            Ok(())
        }
        Display::TooLarge {
            rows,
            numeric_columns,
        } => Err(eyre!(
            "{} rows x {} numeric columns may be slow to render as {}. Pass --unrestricted to export anyway.",
            rows,
            numeric_columns,
            kind
        )),
        Display::FormatHelp(help) => Err(eyre!(
            "{}\n\n{}",
            help.reason
                .clone()
                .unwrap_or_else(|| "The result could not be drawn with this chart.".to_string()),
            help.explanation
        )),
        Display::QueryFailed { message } => Err(eyre!("{}", message)),
        Display::Empty => Err(eyre!("Nothing to export")),
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tabchart::init_logging();

    if let Some(()) = handle_early_exit_flags(&args)? {
        return Ok(());
    }

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
