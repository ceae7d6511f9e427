pub mod cli;
pub mod jq_exec;

fn main() {
    let command_line_interface = cli::CommandLineInterface::load();
    let outcome = command_line_interface
        .init_tracing()
        .and_then(|()| command_line_interface.run());
    if let Err(error) = outcome {
        eprintln!("safecall: {error:#}");
        std::process::exit(1);
    }
}
