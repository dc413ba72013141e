use chrono::Local;
use console::style;
use tracing::info;

use crate::cli::commands::GenerateArgs;
use crate::cli::progress::{spinner, ANALYZING_MESSAGE};
use crate::cli::{load_config, print_written};
use crate::config::{Overrides, Settings};
use crate::errors::ReportError;
use crate::llm::GeminiProvider;
use crate::pipeline::generate_report;
use crate::prompts::{PromptLoader, PromptVariables};
use crate::reporting::render::render_document;
use crate::reporting::terminal::{render_recovered_sources, render_terminal};
use crate::reporting::write_exports;
use crate::utils::formatting::format_duration;

pub async fn handle_generate(
    args: GenerateArgs,
    config_path: Option<&str>,
    quiet: bool,
) -> Result<(), ReportError> {
    let config = load_config(config_path).await?;
    let overrides = Overrides {
        api_key: args.api_key.clone(),
        model: args.model.clone(),
        output_dir: args.output.clone(),
    };
    let settings = Settings::resolve(&config, &overrides)?;

    let prompt = PromptLoader::new(settings.prompt_file.clone())
        .render(&PromptVariables::for_date(Local::now().date_naive()))?;
    let provider = GeminiProvider::with_base_url(&settings.api_key, Some(settings.model.as_str()), &settings.base_url);

    let started = std::time::Instant::now();
    let bar = (!quiet).then(|| spinner(ANALYZING_MESSAGE));
    let result = generate_report(&provider, &prompt).await;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    let generated = match result {
        Ok(generated) => generated,
        Err(failure) => {
            if !failure.sources.is_empty() && !quiet {
                eprintln!("{}", render_recovered_sources(&failure.sources));
            }
            return Err(failure.error);
        }
    };

    if !quiet {
        let document = render_document(&generated.report, &generated.sources);
        println!("{}", render_terminal(&document));
        println!(
            "\n{} {}",
            style("Generado en").dim(),
            style(format_duration(started.elapsed().as_millis() as u64)).dim()
        );
    }

    let written = write_exports(&generated, &args.formats.formats(), &settings.output_dir).await?;
    info!(generation_id = %generated.generation_id, exports = written.len(), "Generate command finished");
    print_written(&written, quiet);
    Ok(())
}
