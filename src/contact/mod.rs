use std::time::Duration;

use thiserror::Error;
use tokio::time::sleep;
use tracing::info;

pub const SENDING_DELAY: Duration = Duration::from_secs(1);
pub const SENT_DELAY: Duration = Duration::from_secs(3);

pub fn inquiry_message(address: &str) -> String {
    format!("Hi, I would like to know more about {address}")
}

pub fn modal_heading(agent_name: &str) -> String {
    format!("Contact {agent_name}")
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl ContactDetails {
    /// Form as it opens from a listing card: message prefilled for the address.
    pub fn prefilled(address: &str) -> Self {
        Self {
            message: inquiry_message(address),
            ..Self::default()
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContactError {
    #[error("{0} is required")]
    MissingField(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Sending,
    Sent,
}

impl SubmitState {
    /// Submit button caption for this state.
    pub fn button_label(self) -> &'static str {
        match self {
            Self::Idle => "Send Message",
            Self::Sending => "Sending...",
            Self::Sent => "Message Sent",
        }
    }
}

/// Simulated contact submission. Nothing leaves the process.
#[derive(Clone, Debug)]
pub struct ContactForm {
    recipient: String,
    state: SubmitState,
    sending_delay: Duration,
    sent_delay: Duration,
}

impl ContactForm {
    pub fn new(recipient: impl Into<String>) -> Self {
        Self::with_timings(recipient, SENDING_DELAY, SENT_DELAY)
    }

    pub fn with_timings(recipient: impl Into<String>, sending: Duration, sent: Duration) -> Self {
        Self {
            recipient: recipient.into(),
            state: SubmitState::Idle,
            sending_delay: sending,
            sent_delay: sent,
        }
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    pub fn heading(&self) -> String {
        modal_heading(&self.recipient)
    }

    fn validate(details: &ContactDetails) -> Result<(), ContactError> {
        let required = [
            ("name", &details.name),
            ("email", &details.email),
            ("message", &details.message),
        ];
        match required.iter().find(|(_, v)| v.trim().is_empty()) {
            Some((field, _)) => Err(ContactError::MissingField(*field)),
            None => Ok(()),
        }
    }

    /// Walks Idle -> Sending -> Sent -> Idle, reporting each state to
    /// `on_state`. Returns the confirmation shown once the form resets.
    pub async fn submit<F>(
        &mut self,
        details: &ContactDetails,
        mut on_state: F,
    ) -> Result<String, ContactError>
    where
        F: FnMut(SubmitState),
    {
        Self::validate(details)?;
        self.transition(SubmitState::Sending, &mut on_state);
        sleep(self.sending_delay).await;
        self.transition(SubmitState::Sent, &mut on_state);
        sleep(self.sent_delay).await;
        self.transition(SubmitState::Idle, &mut on_state);
        info!(recipient = %self.recipient, "contact message simulated");
        Ok(format!("Message sent to {}!", self.recipient))
    }

    fn transition<F: FnMut(SubmitState)>(&mut self, next: SubmitState, on_state: &mut F) {
        self.state = next;
        on_state(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> ContactDetails {
        ContactDetails {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: String::new(),
            message: inquiry_message("12 Elm St"),
        }
    }

    #[tokio::test]
    async fn submit_walks_states_and_returns_to_idle() {
        let mut form = ContactForm::with_timings("Sarah Jenkins", Duration::ZERO, Duration::ZERO);
        let mut seen = Vec::new();
        let confirmation = form.submit(&details(), |s| seen.push(s)).await.unwrap();
        assert_eq!(
            seen,
            vec![SubmitState::Sending, SubmitState::Sent, SubmitState::Idle]
        );
        assert_eq!(form.state(), SubmitState::Idle);
        assert_eq!(confirmation, "Message sent to Sarah Jenkins!");
    }

    #[tokio::test]
    async fn missing_fields_are_rejected_before_sending() {
        let mut form = ContactForm::with_timings("Sarah", Duration::ZERO, Duration::ZERO);
        let mut d = details();
        d.email = "  ".to_string();
        let mut seen = Vec::new();
        let err = form.submit(&d, |s| seen.push(s)).await.unwrap_err();
        assert_eq!(err, ContactError::MissingField("email"));
        assert!(seen.is_empty());
        assert_eq!(form.state(), SubmitState::Idle);
    }

    #[test]
    fn prefill_and_heading() {
        assert_eq!(
            ContactDetails::prefilled("1 Main St").message,
            "Hi, I would like to know more about 1 Main St"
        );
        assert_eq!(ContactForm::new("Michael Chang").heading(), "Contact Michael Chang");
        assert_eq!(SubmitState::Sending.button_label(), "Sending...");
    }
}
