//! 交互式补齐缺失配置。

use std::{
    collections::VecDeque,
    io::{self, BufRead, Write},
};

use crate::error::GeocoderError;

/// 向用户提问并读取一行回答。
pub trait Prompter {
    /// 输出 `question` 并返回去掉首尾空白的非空回答。
    fn ask(&mut self, question: &str) -> Result<String, GeocoderError>;
}

/// 基于任意读写端的提示器，命令行使用标准输入输出。
#[derive(Debug)]
pub struct StdioPrompter<R, W> {
    input: R,
    output: W,
}

impl StdioPrompter<io::StdinLock<'static>, io::Stderr> {
    /// 标准输入读取、标准错误提示，避免污染标准输出。
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> StdioPrompter<R, W> {
    /// 以给定读写端构造。
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompter for StdioPrompter<R, W> {
    fn ask(&mut self, question: &str) -> Result<String, GeocoderError> {
        loop {
            write!(self.output, "{question}")
                .and_then(|()| self.output.flush())
                .map_err(|err| GeocoderError::Prompt(err.to_string()))?;

            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .map_err(|err| GeocoderError::Prompt(err.to_string()))?;
            if read == 0 {
                return Err(GeocoderError::Prompt(format!("回答 `{}` 前输入已结束", question.trim())));
            }

            let answer = line.trim();
            if !answer.is_empty() {
                return Ok(answer.to_owned());
            }
        }
    }
}

/// 按预设答案依次回答的提示器，并记录被问到的问题。
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    /// 以预设答案构造。
    pub fn new<I>(answers: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// 已被问到的问题，按顺序排列。
    #[must_use]
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, question: &str) -> Result<String, GeocoderError> {
        self.asked.push(question.to_owned());
        self.answers
            .pop_front()
            .ok_or_else(|| GeocoderError::Prompt(format!("没有为 `{}` 预设回答", question.trim())))
    }
}
