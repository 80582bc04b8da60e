//! Command tree and parse-outcome classification
//!
//! The global options are clap's business; everything after them is a
//! command path plus residual arguments, resolved here against a
//! registered `CommandSpec` tree. The walk produces a `ParseOutcome`
//! that the caller turns into exactly one of: run a command, list the
//! available commands, print help, or report a genuine parse error.

use std::io::Write;

use anyhow::Result;
use futures::future::BoxFuture;

use crate::wallet::WalletHandle;

/// Handler for a command that runs without a wallet.
pub type PlainRun = for<'a> fn(&'a [String]) -> BoxFuture<'a, Result<()>>;

/// Handler for a command that receives the live wallet connection.
pub type WalletRun = for<'a> fn(&'a WalletHandle, &'a [String]) -> BoxFuture<'a, Result<()>>;

/// Capability tag of a runnable command. The dispatcher matches on the
/// variant; it never inspects handler types.
#[derive(Clone, Copy)]
pub enum Exec {
    Plain(PlainRun),
    Wallet(WalletRun),
}

/// One node of the command tree. Group nodes have children and no exec;
/// runnable nodes have an exec and consume all remaining tokens as
/// arguments.
pub struct CommandSpec {
    pub name: &'static str,
    pub about: &'static str,
    pub exec: Option<Exec>,
    pub children: Vec<CommandSpec>,
}

impl CommandSpec {
    pub fn wallet(name: &'static str, about: &'static str, run: WalletRun) -> Self {
        Self {
            name,
            about,
            exec: Some(Exec::Wallet(run)),
            children: Vec::new(),
        }
    }

    pub fn plain(name: &'static str, about: &'static str, run: PlainRun) -> Self {
        Self {
            name,
            about,
            exec: Some(Exec::Plain(run)),
            children: Vec::new(),
        }
    }

    pub fn group(name: &'static str, about: &'static str, children: Vec<CommandSpec>) -> Self {
        Self {
            name,
            about,
            exec: None,
            children,
        }
    }

    pub fn needs_wallet(&self) -> bool {
        matches!(self.exec, Some(Exec::Wallet(_)))
    }

    fn find_child(&self, name: &str) -> Option<&CommandSpec> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Child command names, sorted and de-duplicated.
    pub fn available_commands(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.children.iter().map(|c| c.name).collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

/// Result of resolving the residual tokens against the command tree.
pub enum ParseOutcome<'p> {
    /// A runnable node was reached. `command` is `None` when the tree
    /// walk ended on a leaf that was registered without a handler.
    Run {
        command: Option<&'p CommandSpec>,
        chain: Vec<&'p CommandSpec>,
        args: Vec<String>,
    },
    /// The walk ended on a node that requires a subcommand.
    NoCommand { chain: Vec<&'p CommandSpec> },
    /// `-h`/`--help` was seen. The chain scopes the help text.
    Help { chain: Vec<&'p CommandSpec> },
    /// A token matched nothing. `printed` records whether the parser
    /// already wrote the message, so the caller never prints it twice.
    Error { message: String, printed: bool },
}

pub struct CommandParser {
    root: CommandSpec,
    print_errors: bool,
}

impl CommandParser {
    pub fn new(root: CommandSpec) -> Self {
        Self {
            root,
            print_errors: false,
        }
    }

    /// Makes the parser print parse errors to stderr as it finds them.
    pub fn with_error_printing(mut self) -> Self {
        self.print_errors = true;
        self
    }

    pub fn root(&self) -> &CommandSpec {
        &self.root
    }

    pub fn parse(&self, tokens: &[String]) -> ParseOutcome<'_> {
        let mut node = &self.root;
        let mut chain: Vec<&CommandSpec> = Vec::new();

        let mut tokens = tokens.iter();
        while let Some(token) = tokens.next() {
            if token == "-h" || token == "--help" {
                return ParseOutcome::Help { chain };
            }

            if let Some(child) = node.find_child(token) {
                node = child;
                chain.push(child);
                continue;
            }

            if node.exec.is_some() {
                // Runnable node: this and all remaining tokens are its
                // arguments, except a help flag anywhere among them.
                let mut args = vec![token.clone()];
                for rest in tokens.by_ref() {
                    if rest == "-h" || rest == "--help" {
                        return ParseOutcome::Help { chain };
                    }
                    args.push(rest.clone());
                }
                return ParseOutcome::Run {
                    command: Some(node),
                    chain,
                    args,
                };
            }

            let message = format!("unknown command or flag: {token}");
            if self.print_errors {
                eprintln!("{message}");
            }
            return ParseOutcome::Error {
                message,
                printed: self.print_errors,
            };
        }

        if chain.is_empty() {
            return ParseOutcome::NoCommand { chain };
        }

        match node.exec {
            Some(_) => ParseOutcome::Run {
                command: Some(node),
                chain,
                args: Vec::new(),
            },
            None if !node.children.is_empty() => ParseOutcome::NoCommand { chain },
            // A leaf without a handler is a registration defect; the
            // dispatcher reports it as such.
            None => ParseOutcome::Run {
                command: None,
                chain,
                args: Vec::new(),
            },
        }
    }
}

/// Full name of a resolved chain, parent to leaf, e.g. `account new`.
pub fn rendered_name(chain: &[&CommandSpec]) -> String {
    match chain.split_first() {
        None => String::new(),
        Some((first, rest)) => {
            if rest.is_empty() {
                first.name.to_string()
            } else {
                format!("{} {}", first.name, rendered_name(rest))
            }
        }
    }
}

/// Concise help for a resolved subcommand chain.
pub fn write_command_help<W: Write>(out: &mut W, chain: &[&CommandSpec]) -> std::io::Result<()> {
    let node = match chain.last() {
        Some(node) => *node,
        None => return Ok(()),
    };

    let path: Vec<&str> = chain.iter().map(|c| c.name).collect();
    let path = path.join(" ");

    if node.children.is_empty() {
        writeln!(out, "Usage: vela-wallet {path} [args]")?;
    } else {
        writeln!(out, "Usage: vela-wallet {path} <command> [args]")?;
    }
    writeln!(out, "{}", node.about)?;
    if !node.children.is_empty() {
        writeln!(out)?;
        writeln!(out, "Available Commands:")?;
        for child in &node.children {
            writeln!(out, "  {:<12} {}", child.name, child.about)?;
        }
    }
    writeln!(out)?;
    writeln!(out, "To view application options, use 'vela-wallet -h'")
}
