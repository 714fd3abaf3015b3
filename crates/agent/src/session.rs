//! Interactive session: read a line, run one pipeline turn, print the
//! result, repeat.

use agentwire_core::message::{Conversation, Message};
use agentwire_core::{Error, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

use crate::pipelines::Pipeline;

const QUIT_TOKENS: [&str; 3] = ["quit", "exit", "q"];

/// One line of user input, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Quit,
    Empty,
    Message(String),
}

pub fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        Input::Empty
    } else if QUIT_TOKENS.contains(&trimmed.to_lowercase().as_str()) {
        Input::Quit
    } else {
        Input::Message(trimmed.to_string())
    }
}

/// Why a session stopped.
#[derive(Debug)]
pub enum SessionEnd {
    Quit,
    EndOfInput,
    Failed(Error),
}

/// Owns the conversation for one interactive run of a pipeline.
pub struct Session {
    pipeline: Box<dyn Pipeline>,
    conversation: Conversation,
}

impl Session {
    pub fn new(pipeline: Box<dyn Pipeline>) -> Self {
        Self {
            pipeline,
            conversation: Conversation::new(),
        }
    }

    pub fn pipeline_name(&self) -> &str {
        self.pipeline.name()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Append `user_input` and run the pipeline on it.
    pub async fn turn(&mut self, user_input: &str) -> Result<String> {
        self.conversation.push(Message::user(user_input));
        info!(
            pipeline = self.pipeline.name(),
            conversation_id = %self.conversation.id,
            messages = self.conversation.len(),
            "Turn started"
        );
        self.pipeline.run_turn(&mut self.conversation).await
    }

    /// Drive the session over `input`/`output` until the user quits, input
    /// ends, or a step fails.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> std::io::Result<SessionEnd>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        loop {
            output.write_all(b"\nUser: ").await?;
            output.flush().await?;

            let Some(line) = lines.next_line().await? else {
                return Ok(SessionEnd::EndOfInput);
            };

            let text = match parse_input(&line) {
                Input::Quit => {
                    output.write_all(b"Goodbye!\n").await?;
                    output.flush().await?;
                    return Ok(SessionEnd::Quit);
                }
                Input::Empty => continue,
                Input::Message(text) => text,
            };

            match self.turn(&text).await {
                Ok(display) => {
                    output.write_all(format!("\n{display}\n").as_bytes()).await?;
                }
                Err(e) => {
                    output
                        .write_all(format!("An error occurred: {e}\n").as_bytes())
                        .await?;
                    output.flush().await?;
                    warn!(error = %e, "Session ended by error");
                    return Ok(SessionEnd::Failed(e));
                }
            }
            output.flush().await?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentwire_core::error::{ProviderError, ToolError};
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Echoes the user turn, or fails with a scripted error.
    struct EchoPipeline {
        calls: Arc<AtomicUsize>,
        fail: Option<fn() -> Error>,
    }

    #[async_trait]
    impl Pipeline for EchoPipeline {
        fn name(&self) -> &str {
            "echo"
        }

        async fn run_turn(&mut self, conversation: &mut Conversation) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(fail) = self.fail {
                return Err(fail());
            }
            let text = conversation.current_user_turn()?.content.clone();
            conversation.push(Message::assistant(&text));
            Ok(format!("echo: {text}"))
        }
    }

    fn session(fail: Option<fn() -> Error>) -> (Session, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = EchoPipeline {
            calls: calls.clone(),
            fail,
        };
        (Session::new(Box::new(pipeline)), calls)
    }

    async fn drive(session: &mut Session, script: &str) -> (SessionEnd, String) {
        let mut out = Vec::new();
        let end = session.run(script.as_bytes(), &mut out).await.unwrap();
        (end, String::from_utf8(out).unwrap())
    }

    #[test]
    fn quit_tokens_in_any_case() {
        for token in ["quit", "QUIT", "Exit", "q", "Q", "  q  "] {
            assert_eq!(parse_input(token), Input::Quit, "{token}");
        }
        assert_eq!(parse_input("quite"), Input::Message("quite".into()));
        assert_eq!(parse_input("   "), Input::Empty);
    }

    #[tokio::test]
    async fn quit_ends_without_running_a_turn() {
        for token in ["quit", "EXIT", "Q"] {
            let (mut session, calls) = session(None);
            let (end, out) = drive(&mut session, &format!("{token}\nhello\n")).await;
            assert!(matches!(end, SessionEnd::Quit));
            assert_eq!(session.pipeline_name(), "echo");
            assert!(out.contains("Goodbye!"));
            assert_eq!(calls.load(Ordering::SeqCst), 0);
            assert!(session.conversation().is_empty());
        }
    }

    #[tokio::test]
    async fn turns_accumulate_until_end_of_input() {
        let (mut session, calls) = session(None);
        let (end, out) = drive(&mut session, "one\n\ntwo\nthree\n").await;

        assert!(matches!(end, SessionEnd::EndOfInput));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(out.contains("echo: one"));
        assert!(out.contains("echo: three"));
        // Append-only: three user turns and three replies, in order.
        assert_eq!(session.conversation().len(), 6);
        assert_eq!(session.conversation().messages()[2].content, "two");
    }

    #[tokio::test]
    async fn step_failure_is_printed_and_ends_session() {
        fn timeout() -> Error {
            Error::Provider(ProviderError::Timeout("120s".into()))
        }
        let (mut session, calls) = session(Some(timeout));
        let (end, out) = drive(&mut session, "hello\nagain\n").await;

        assert!(matches!(end, SessionEnd::Failed(Error::Provider(_))));
        assert!(out.contains("An error occurred: Provider error: Request timed out"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn tool_error_also_ends_session() {
        fn unknown_tool() -> Error {
            Error::Tool(ToolError::NotFound("teleport".into()))
        }
        let (mut session, calls) = session(Some(unknown_tool));
        let (end, out) = drive(&mut session, "a\nb\n").await;

        assert!(matches!(end, SessionEnd::Failed(Error::Tool(_))));
        assert!(out.contains("An error occurred: Tool error"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.conversation().len(), 1);
    }
}
