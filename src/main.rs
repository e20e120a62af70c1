use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use tv::controller::{Args, Controller};
use tv::domain::TVError;
use tv::logging;
use tv::model::Model;
use tv::render;

fn main() -> ExitCode {
    match run() {
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn run() -> Result<(), TVError> {
    let controller = Controller::new(Args::parse());
    let args = controller.args();
    logging::init(args.verbose, args.log_file.as_deref())?;
    info!("Starting tv!");

    let cfg = controller.config();
    let mut model = Model::init(&cfg);

    for message in controller.file_messages() {
        model.update(message)?;
    }

    if args.list {
        for name in model.files().names() {
            println!("{name}");
        }
        return Ok(());
    }

    for message in controller.view_messages(&model)? {
        model.update(message)?;
    }

    println!(
        "{}",
        render::render(model.view(), args.format, cfg.max_column_width)
    );
    eprintln!("{}", model.status_message());
    Ok(())
}
