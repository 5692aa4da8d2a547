//! 邮件协作方
//!
//! 发送失败不会影响业务结果：调用方记录日志后继续。
//!
use std::time::Duration;

use async_trait::async_trait;
use bon::Builder;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

/// 待发送的邮件（HTML 正文）
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    #[builder(into)]
    pub from: String,
    #[builder(into)]
    pub to: String,
    #[builder(into)]
    pub subject: String,
    #[builder(into)]
    pub html_body: String,
}

/// 发送结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendResult {
    Success,
    SendError(String),
    AuthenticationError(String),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &MailMessage) -> SendResult;
}

/// 仅写日志的实现
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &MailMessage) -> SendResult {
        tracing::info!(
            from = %message.from,
            to = %message.to,
            subject = %message.subject,
            body = %message.html_body,
            "mail"
        );
        SendResult::Success
    }
}

/// 简单 SMTP 实现（无 TLS、无认证），整个会话受时限约束
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    host: String,
    port: u16,
    timeout: Duration,
}

#[derive(Debug)]
enum SmtpFailure {
    Io(std::io::Error),
    Rejected { code: u16, reply: String },
}

impl From<std::io::Error> for SmtpFailure {
    fn from(err: std::io::Error) -> Self {
        SmtpFailure::Io(err)
    }
}

impl SmtpMailer {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    async fn dialog(&self, message: &MailMessage) -> Result<(), SmtpFailure> {
        let stream = TcpStream::connect((self.host.as_str(), self.port)).await?;
        let (read, mut write) = stream.into_split();
        let mut read = BufReader::new(read);

        expect_reply(&mut read, 220).await?;
        command(&mut write, &mut read, "EHLO localhost", 250).await?;
        command(
            &mut write,
            &mut read,
            &format!("MAIL FROM:<{}>", message.from),
            250,
        )
        .await?;
        command(
            &mut write,
            &mut read,
            &format!("RCPT TO:<{}>", message.to),
            250,
        )
        .await?;
        command(&mut write, &mut read, "DATA", 354).await?;

        let data = format!(
            "From: {}\r\nTo: {}\r\nSubject: {}\r\nMIME-Version: 1.0\r\nContent-Type: text/html; charset=UTF-8\r\n\r\n{}\r\n.",
            message.from,
            message.to,
            message.subject,
            dot_stuff(&message.html_body),
        );
        command(&mut write, &mut read, &data, 250).await?;
        command(&mut write, &mut read, "QUIT", 221).await?;
        Ok(())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: &MailMessage) -> SendResult {
        match tokio::time::timeout(self.timeout, self.dialog(message)).await {
            Ok(Ok(())) => SendResult::Success,
            Ok(Err(SmtpFailure::Rejected { code, reply })) if code == 530 || code == 535 => {
                SendResult::AuthenticationError(reply)
            }
            Ok(Err(SmtpFailure::Rejected { reply, .. })) => SendResult::SendError(reply),
            Ok(Err(SmtpFailure::Io(e))) => SendResult::SendError(e.to_string()),
            Err(_) => SendResult::SendError(format!(
                "smtp timeout after {}ms",
                self.timeout.as_millis()
            )),
        }
    }
}

async fn command<W, R>(
    write: &mut W,
    read: &mut R,
    line: &str,
    expected: u16,
) -> Result<(), SmtpFailure>
where
    W: AsyncWriteExt + Unpin,
    R: AsyncBufReadExt + Unpin,
{
    write.write_all(line.as_bytes()).await?;
    write.write_all(b"\r\n").await?;
    write.flush().await?;
    expect_reply(read, expected).await
}

/// 读取一条（可能多行的）应答并检查状态码
async fn expect_reply<R>(read: &mut R, expected: u16) -> Result<(), SmtpFailure>
where
    R: AsyncBufReadExt + Unpin,
{
    let mut reply = String::new();
    loop {
        let mut line = String::new();
        if read.read_line(&mut line).await? == 0 {
            return Err(SmtpFailure::Io(std::io::ErrorKind::UnexpectedEof.into()));
        }
        reply.push_str(&line);
        // "250-..." 表示后续还有行
        if line.as_bytes().get(3) != Some(&b'-') {
            break;
        }
    }

    let code = reply
        .get(..3)
        .and_then(|c| c.parse::<u16>().ok())
        .unwrap_or_default();
    if code == expected {
        Ok(())
    } else {
        Err(SmtpFailure::Rejected {
            code,
            reply: reply.trim_end().to_string(),
        })
    }
}

fn dot_stuff(body: &str) -> String {
    body.split('\n')
        .map(|l| {
            if l.starts_with('.') {
                format!(".{l}")
            } else {
                l.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
