//! Line-oriented terminal surface for the registry controller.
//!
//! # Invariants
//! - Table row numbers map to the ids of the last rendered view only.
//! - I/O failures never panic; a closed input ends the session.

use log::warn;
use std::fmt::Arguments;
use std::io::{BufRead, Write};
use userreg_core::{
    FormSurface, NoticeLevel, PasswordVisibility, PromptSurface, TableSurface, UserFields,
    UserId, UserRow,
};

const MASK: &str = "********";

pub struct TerminalView<R, W> {
    input: R,
    output: W,
    prefill: UserFields,
    submit_label: String,
    password_visibility: PasswordVisibility,
    visible_ids: Vec<UserId>,
    closed: bool,
}

impl<R: BufRead, W: Write> TerminalView<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            prefill: UserFields::default(),
            submit_label: String::new(),
            password_visibility: PasswordVisibility::Masked,
            visible_ids: Vec::new(),
            closed: false,
        }
    }

    /// Reads one line without its terminator. Returns `None` at end of input.
    pub fn read_line(&mut self) -> Option<String> {
        if self.closed {
            return None;
        }
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => {
                self.closed = true;
                None
            }
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(err) => {
                warn!("event=terminal_read module=cli status=error error={err}");
                self.closed = true;
                None
            }
        }
    }

    /// Prints `label` without a newline and reads the answer.
    pub fn prompt(&mut self, label: &str) -> Option<String> {
        self.emit(format_args!("{label}"));
        self.flush();
        self.read_line()
    }

    /// Id of the user shown at a 1-based row of the current table.
    pub fn id_at_row(&self, row: usize) -> Option<UserId> {
        row.checked_sub(1)
            .and_then(|index| self.visible_ids.get(index))
            .copied()
    }

    pub fn submit_label(&self) -> &str {
        &self.submit_label
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, args: Arguments<'_>) {
        self.emit(args);
        self.emit(format_args!("\n"));
    }

    fn emit(&mut self, args: Arguments<'_>) {
        if let Err(err) = self.output.write_fmt(args) {
            warn!("event=terminal_write module=cli status=error error={err}");
        }
    }

    fn flush(&mut self) {
        if let Err(err) = self.output.flush() {
            warn!("event=terminal_flush module=cli status=error error={err}");
        }
    }

    fn read_field(&mut self, label: &str, current: &str, secret: bool) -> String {
        let shown = if current.is_empty() {
            String::new()
        } else if secret && self.password_visibility == PasswordVisibility::Masked {
            format!(" [{MASK}]")
        } else {
            format!(" [{current}]")
        };
        match self.prompt(&format!("{label}{shown}: ")) {
            Some(answer) if answer.is_empty() => current.to_string(),
            Some(answer) => answer,
            None => String::new(),
        }
    }
}

impl<R: BufRead, W: Write> FormSurface for TerminalView<R, W> {
    /// Prompts for each field; an empty answer keeps the prefilled value.
    fn read_fields(&mut self) -> UserFields {
        let current = self.prefill.clone();
        let fields = UserFields {
            name: self.read_field("Name", &current.name, false),
            email: self.read_field("Email", &current.email, false),
            mobile: self.read_field("Mobile", &current.mobile, false),
            password: self.read_field("Password", &current.password, true),
        };
        self.prefill = fields.clone();
        fields
    }

    fn fill_fields(&mut self, fields: &UserFields) {
        self.prefill = fields.clone();
        self.say(format_args!("Editing {}; type `submit` to save.", fields.name));
    }

    fn clear_fields(&mut self) {
        self.prefill = UserFields::default();
    }

    // The next `submit` always starts at the first field.
    fn focus_first_field(&mut self) {}

    fn set_submit_label(&mut self, label: &str) {
        self.submit_label = label.to_string();
    }

    fn set_password_visibility(&mut self, visibility: PasswordVisibility) {
        self.password_visibility = visibility;
    }
}

impl<R: BufRead, W: Write> TableSurface for TerminalView<R, W> {
    fn render_rows(&mut self, rows: &[UserRow<'_>]) {
        self.visible_ids = rows.iter().map(|row| row.id).collect();
        self.say(format_args!(
            "{:>3}  {:<20} {:<28} {:<10}",
            "#", "Name", "Email", "Mobile"
        ));
        for row in rows {
            self.say(format_args!(
                "{:>3}  {:<20} {:<28} {:<10}",
                row.position, row.name, row.email, row.mobile
            ));
        }
    }

    fn render_empty(&mut self, message: &str) {
        self.visible_ids.clear();
        self.say(format_args!("  {message}"));
    }

    fn set_count_label(&mut self, count: usize) {
        self.say(format_args!("Users List ({count} users)"));
    }
}

impl<R: BufRead, W: Write> PromptSurface for TerminalView<R, W> {
    fn confirm(&mut self, message: &str) -> bool {
        matches!(
            self.prompt(&format!("{message} [y/N] "))
                .map(|answer| answer.trim().to_ascii_lowercase())
                .as_deref(),
            Some("y" | "yes")
        )
    }

    fn notify(&mut self, level: NoticeLevel, message: &str) {
        let tag = match level {
            NoticeLevel::Info => "ok",
            NoticeLevel::Error => "error",
        };
        self.say(format_args!("[{tag}] {message}"));
    }
}
