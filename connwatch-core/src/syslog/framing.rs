use crate::syslog::FrameError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

pub const MAX_FRAME_LEN: usize = 64 * 1024;

// Ten digits is already far beyond MAX_FRAME_LEN.
const MAX_LENGTH_DIGITS: u64 = 10;

/// Splits a TCP byte stream into syslog messages.
///
/// Frames starting with a digit are octet-counted (`LEN SP MSG`), anything
/// else runs up to the next LF.
pub struct FrameReader<R> {
    inner: R,
}

impl<R> FrameReader<R>
where
    R: AsyncBufRead + Unpin,
{
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Next message, or `None` once the peer has closed the stream.
    pub async fn next_frame(&mut self) -> Result<Option<String>, FrameError> {
        loop {
            let first = match self.inner.fill_buf().await?.first() {
                Some(b) => *b,
                None => return Ok(None),
            };

            let frame = if first.is_ascii_digit() {
                self.octet_counted().await?
            } else {
                match self.line().await? {
                    Some(line) => line,
                    None => return Ok(None),
                }
            };

            // Blank keep-alive lines carry nothing.
            if frame.is_empty() {
                continue;
            }

            return String::from_utf8(frame)
                .map(Some)
                .map_err(|_| FrameError::NotUtf8);
        }
    }

    async fn octet_counted(&mut self) -> Result<Vec<u8>, FrameError> {
        let mut digits = Vec::new();
        (&mut self.inner)
            .take(MAX_LENGTH_DIGITS + 1)
            .read_until(b' ', &mut digits)
            .await?;

        if digits.last() != Some(&b' ') {
            return Err(FrameError::InvalidLength(
                String::from_utf8_lossy(&digits).into_owned(),
            ));
        }
        digits.pop();

        let len = std::str::from_utf8(&digits)
            .ok()
            .filter(|s| s.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|s| s.parse::<usize>().ok())
            .ok_or_else(|| {
                FrameError::InvalidLength(String::from_utf8_lossy(&digits).into_owned())
            })?;

        if len > MAX_FRAME_LEN {
            return Err(FrameError::TooLong { max: MAX_FRAME_LEN });
        }

        let mut frame = vec![0; len];
        self.inner
            .read_exact(&mut frame)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::UnexpectedEof => FrameError::Truncated,
                _ => FrameError::Io(e),
            })?;

        Ok(frame)
    }

    async fn line(&mut self) -> Result<Option<Vec<u8>>, FrameError> {
        let mut line = Vec::new();
        let n = (&mut self.inner)
            .take(MAX_FRAME_LEN as u64 + 1)
            .read_until(b'\n', &mut line)
            .await?;

        if n == 0 {
            return Ok(None);
        }

        if line.last() == Some(&b'\n') {
            line.pop();
        } else if line.len() > MAX_FRAME_LEN {
            return Err(FrameError::TooLong { max: MAX_FRAME_LEN });
        }

        if line.last() == Some(&b'\r') {
            line.pop();
        }

        Ok(Some(line))
    }
}
