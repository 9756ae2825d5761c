//! Binary entrypoint for fontslim-cli (made by FontLab https://www.fontlab.com/)

fn main() {
    if let Err(err) = fontslim_cli::run() {
        if let Some(exit) = err.downcast_ref::<fontslim_cli::ExitCodeError>() {
            std::process::exit(exit.0);
        }
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
