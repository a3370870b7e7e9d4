//! Interactive read-dispatch loop.

use crate::command::{Command, HELP};
use crate::terminal::TerminalView;
use std::io::{BufRead, Write};
use userreg_core::{BlobStore, Clock, Mode, RegistryController};

type TerminalController<S, R, W, C> = RegistryController<S, TerminalView<R, W>, C>;

/// Runs commands until `quit` or end of input.
pub fn run<S, R, W, C>(controller: &mut TerminalController<S, R, W, C>)
where
    S: BlobStore,
    R: BufRead,
    W: Write,
    C: Clock,
{
    controller.init();
    controller
        .view_mut()
        .say(format_args!("Type `help` for commands."));

    loop {
        let label = match controller.mode() {
            Mode::Create => "userreg> ".to_string(),
            Mode::Update(id) => format!("userreg (editing {id})> "),
        };
        let Some(line) = controller.view_mut().prompt(&label) else {
            break;
        };

        match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => dispatch(controller, command),
            Err(message) => controller.view_mut().say(format_args!("{message}")),
        }
    }
}

fn dispatch<S, R, W, C>(controller: &mut TerminalController<S, R, W, C>, command: Command)
where
    S: BlobStore,
    R: BufRead,
    W: Write,
    C: Clock,
{
    match command {
        Command::Submit => {
            let label = controller.view().submit_label().to_string();
            controller.view_mut().say(format_args!("-- {label} --"));
            controller.submit();
        }
        Command::Edit(row) | Command::Delete(row) => {
            let Some(id) = controller.view().id_at_row(row) else {
                controller
                    .view_mut()
                    .say(format_args!("no user at row {row}"));
                return;
            };
            if matches!(command, Command::Edit(_)) {
                controller.edit(id);
            } else {
                controller.delete(id);
            }
        }
        Command::Search(term) => controller.search(&term),
        Command::Clear => controller.clear_form(),
        Command::Toggle => {
            controller.toggle_password_visibility();
            let state = format!("{:?}", controller.password_visibility()).to_lowercase();
            controller
                .view_mut()
                .say(format_args!("password display: {state}"));
        }
        Command::List => {
            let term = controller.search_term().to_string();
            controller.search(&term);
        }
        Command::Reload => controller.reload(),
        Command::Help => controller.view_mut().say(format_args!("{HELP}")),
        Command::Quit => {}
    }
}
