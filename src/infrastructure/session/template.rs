//! Command template rendering.

use crate::domain::NodeDescriptor;
use crate::infrastructure::config::session::COMMAND_PLACEHOLDER;

/// Values substituted into a node command template.
#[derive(Debug, Clone, Copy)]
pub struct TemplateVars<'a> {
    pub host: &'a str,
    pub index: &'a str,
    pub session: &'a str,
}

impl<'a> TemplateVars<'a> {
    /// Replace `{host}`, `{index}`, and `{session}` in `template`.
    ///
    /// Single pass: substituted values are not scanned again. Unknown
    /// placeholders are left as they are.
    #[must_use]
    pub fn render(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            match self.lookup(tail) {
                Some((value, len)) => {
                    out.push_str(value);
                    rest = &tail[len..];
                }
                None => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }

    fn lookup(&self, tail: &str) -> Option<(&'a str, usize)> {
        [
            ("{host}", self.host),
            ("{index}", self.index),
            ("{session}", self.session),
        ]
        .into_iter()
        .find(|(key, _)| tail.starts_with(key))
        .map(|(key, value)| (value, key.len()))
    }

    /// Render `command`, then place it into the rendered `launcher`.
    ///
    /// The command is substituted last so its text is never re-expanded.
    #[must_use]
    pub fn wrap(&self, launcher: &str, command: &str) -> String {
        let command = self.render(command);
        self.render(launcher).replace(COMMAND_PLACEHOLDER, &command)
    }
}

/// Render `command` for `node` through `launcher`.
#[must_use]
pub fn node_command(launcher: &str, command: &str, node: &NodeDescriptor, session: &str) -> String {
    let index = node.index().to_string();
    TemplateVars {
        host: node.host_name(),
        index: &index,
        session,
    }
    .wrap(launcher, command)
}
