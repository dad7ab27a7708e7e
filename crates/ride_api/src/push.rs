use std::io;

use futures::{future, Stream, StreamExt, TryStreamExt};
use model::event::PushEvent;
use tokio_util::{
    codec::{FramedRead, LinesCodec},
    io::StreamReader,
};

use crate::{event_stream::EventStreamDecoder, ApiError};

/// Longest line accepted from the event stream.
const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Client side of the server push channel: one long lived
/// `text/event-stream` request.
#[derive(Debug, Clone)]
pub struct PushChannel {
    url: String,
    client: reqwest::Client,
}

impl PushChannel {
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Opens the channel. The returned stream yields every event this client
    /// understands and ends when the server closes the connection. Payloads
    /// that fail to parse are yielded as errors without ending the stream.
    pub async fn connect(
        &self,
    ) -> Result<impl Stream<Item = Result<PushEvent, ApiError>> + Send + 'static, ApiError>
    {
        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::InvalidResponse {
                status_code: status,
                url: self.url.clone(),
                response: response.text().await.ok(),
            });
        }
        log::info!("Connected to server at '{}'", self.url);

        let body = response
            .bytes_stream()
            .map_err(|why| io::Error::new(io::ErrorKind::Other, why));
        let lines = FramedRead::new(
            StreamReader::new(body),
            LinesCodec::new_with_max_length(MAX_LINE_LENGTH),
        );

        let mut decoder = EventStreamDecoder::default();
        let events = lines.filter_map(move |line| {
            let item = match line {
                Ok(line) => decoder.push_line(&line).and_then(|frame| {
                    match PushEvent::decode(&frame.event, &frame.data) {
                        Ok(Some(event)) => Some(Ok(event)),
                        Ok(None) => {
                            log::debug!("ignoring push event '{}'", frame.event);
                            None
                        }
                        Err(why) => Some(Err(ApiError::from(why))),
                    }
                }),
                Err(why) => Some(Err(ApiError::from(why))),
            };
            future::ready(item)
        });

        Ok(events)
    }
}
