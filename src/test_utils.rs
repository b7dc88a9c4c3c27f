#[cfg(test)]
pub mod fixtures {
    use secrecy::SecretString;

    use crate::config::LlmSettings;

    pub const PHOTOSYNTHESIS_TEXT: &str = "Photosynthesis is the process by which plants convert light energy into chemical energy. \
         Chlorophyll absorbs light, and the energy drives the conversion of carbon dioxide and water into glucose and oxygen.";

    pub const SUMMARY_RESPONSE: &str =
        "STEP 1: Main Points\n- AI improves learning\nSTEP 2: Synthesis\n- Connects to outcomes";

    pub const BLOOMS_RESPONSE: &str = "LEVEL 1: Remember\n- What is chlorophyll?\n\
         LEVEL 2: Understand\n- Why do plants need light?\n\
         LEVEL 3: Apply\n- How would a greenhouse change the rate?\n\
         LEVEL 4: Analyze\n- How do light and carbon dioxide interact?\n\
         LEVEL 5: Evaluate\n- Is light the main limiting factor?\n\
         LEVEL 6: Create\n- Design an experiment measuring oxygen output.";

    /// Chat-completion payload carrying `content` as the first choice.
    pub fn chat_completion_body(content: &str) -> String {
        serde_json::json!({
            "id": "cmpl-test",
            "model": "sonar-pro",
            "choices": [
                {
                    "index": 0,
                    "finish_reason": "stop",
                    "message": { "role": "assistant", "content": content }
                }
            ]
        })
        .to_string()
    }

    /// Settings pointing at `url` with a short timeout and no backoff.
    pub fn llm_settings_for(url: &str) -> LlmSettings {
        LlmSettings {
            endpoint_url: url.to_string(),
            api_key: Some(SecretString::from("pplx-test-key-0000000000".to_string())),
            request_timeout_secs: 1,
            retry_backoff_ms: 0,
            ..LlmSettings::default()
        }
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;
    use async_trait::async_trait;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    use crate::services::completion_client::CompletionClient;

    mockall::mock! {
        pub Completion {}

        #[async_trait]
        impl CompletionClient for Completion {
            async fn complete(&self, prompt: &str) -> Option<String>;
        }
    }

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }

    async fn read_request(socket: &mut TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        loop {
            let read = match socket.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(read) => read,
            };
            buf.extend_from_slice(&chunk[..read]);

            let Some(end) = buf.windows(4).position(|window| window == b"\r\n\r\n") else {
                continue;
            };
            let headers = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let content_length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + content_length {
                return;
            }
        }
    }

    /// Serves a single HTTP response on a local port and returns its URL.
    pub async fn serve_once(status: u16, body: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;

            let response = format!(
                "HTTP/1.1 {} Test\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        format!("http://{}/chat/completions", addr)
    }

    /// Accepts one connection and never answers it.
    pub async fn serve_silently() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            tokio::time::sleep(std::time::Duration::from_secs(30)).await;
            drop(socket);
        });

        format!("http://{}/chat/completions", addr)
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::services::completion_client::extract_content;

    #[test]
    fn test_fixtures_chat_completion_body() {
        let body = chat_completion_body(SUMMARY_RESPONSE);
        assert_eq!(extract_content(&body).as_deref(), Some(SUMMARY_RESPONSE));
    }

    #[test]
    fn test_fixtures_llm_settings_for() {
        let settings = llm_settings_for("http://127.0.0.1:9/chat/completions");
        assert!(settings.has_credential());
        assert_eq!(settings.retry_backoff_ms, 0);
        assert_eq!(settings.endpoint_url, "http://127.0.0.1:9/chat/completions");
    }
}
