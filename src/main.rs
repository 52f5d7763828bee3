use geoips::core::InvocationChannel;
use miette::Result;

fn main() -> Result<()> {
    geoips::cli::install_process_hooks()?;
    let code = geoips::cli::run(InvocationChannel::Modern, std::env::args().skip(1));
    std::process::exit(code)
}
