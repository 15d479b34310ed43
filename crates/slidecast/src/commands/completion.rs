use clap::CommandFactory;
use clap_complete::generate;

use crate::cli::{Cli, Shell};

pub fn run(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    match shell {
        Shell::Bash => generate(clap_complete::shells::Bash, &mut cmd, name, &mut std::io::stdout()),
        Shell::Zsh => generate(clap_complete::shells::Zsh, &mut cmd, name, &mut std::io::stdout()),
        Shell::Fish => generate(clap_complete::shells::Fish, &mut cmd, name, &mut std::io::stdout()),
        Shell::Powershell => generate(
            clap_complete::shells::PowerShell,
            &mut cmd,
            name,
            &mut std::io::stdout(),
        ),
    }
}
