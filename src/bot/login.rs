use super::Bot;
use crate::{platform::PrivateMessage, spotify, success, warning};

impl Bot {
    /// Private chat: lets the owner log in to Spotify by pasting the redirect URL.
    pub(crate) async fn on_private_message(&self, message: PrivateMessage) {
        let reply = if message.sender_id == self.config.owner_id
            && !self.spotify.tokens().is_authenticated().await
        {
            self.login_reply(&message.text).await
        } else {
            "meow meow".to_string()
        };

        if let Err(e) = self.platform.send_message(message.chat_id, &reply).await {
            warning!("Cannot reply to private message: {}", e);
        }
    }

    async fn login_reply(&self, text: &str) -> String {
        if text.starts_with("/start") {
            return match spotify::authorize_url(&self.config) {
                Ok(url) => url,
                Err(e) => e.to_string(),
            };
        }

        match self.spotify.refresher().process_redirect(text).await {
            Ok(()) => {
                success!("Logged in to Spotify");
                "ok".to_string()
            }
            Err(e) => {
                warning!("Spotify login failed: {}", e);
                e.to_string()
            }
        }
    }
}
