// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use finance_app::{EventKind, Reply, WindowKind};
use finance_core::Presenter;
use serde_json::{Value, json};
use std::io::{BufRead, Write};

/// Headless view: one JSON event per input line, one JSON reply per output line.
pub struct JsonLinesPresenter<R, W> {
    input: R,
    output: W,
    line: usize,
}

impl<R: BufRead, W: Write> JsonLinesPresenter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            line: 0,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Presenter for JsonLinesPresenter<R, W> {
    fn render(&mut self, reply: &Reply) -> Result<Vec<Value>> {
        serde_json::to_writer(&mut self.output, reply).context("write reply")?;
        self.output.write_all(b"\n").context("write reply")?;
        self.output.flush().context("flush reply")?;

        // A theme reply is applied immediately, then the model picks the window to show.
        if reply.window == WindowKind::Main {
            return Ok(vec![json!({"type": EventKind::ThemeSetup.as_str()})]);
        }
        Ok(Vec::new())
    }

    fn next_event(&mut self) -> Result<Option<Value>> {
        let mut buf = String::new();
        loop {
            buf.clear();
            let read = self.input.read_line(&mut buf).context("read event")?;
            if read == 0 {
                return Ok(None);
            }
            self.line += 1;

            let trimmed = buf.trim();
            if trimmed.is_empty() {
                continue;
            }
            let event = serde_json::from_str(trimmed)
                .with_context(|| format!("parse event on input line {}", self.line))?;
            return Ok(Some(event));
        }
    }
}
