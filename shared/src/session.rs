use crate::Credentials;

/// What the page shows for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    LoginForm,
    Workspace,
}

/// Browser-side authentication flag.
///
/// The server keeps no session, so while authenticated the credentials are
/// held here and attached to every gated request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    credentials: Option<Credentials>,
    pending_prediction: Option<u64>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Called once the server accepted `credentials`.
    pub fn login(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
    }

    pub fn logout(&mut self) {
        self.credentials = None;
        self.pending_prediction = None;
    }

    /// Marks `request_id` as the only prediction whose reply may be shown.
    /// Any earlier request still in flight becomes stale.
    pub fn begin_prediction(&mut self, request_id: u64) {
        self.pending_prediction = Some(request_id);
    }

    /// True iff `request_id` is the pending prediction; it is then settled.
    /// Replies for stale or cancelled requests return false.
    pub fn finish_prediction(&mut self, request_id: u64) -> bool {
        if self.pending_prediction == Some(request_id) {
            self.pending_prediction = None;
            true
        } else {
            false
        }
    }

    pub fn cancel_prediction(&mut self) {
        self.pending_prediction = None;
    }

    pub fn view(&self) -> View {
        if self.is_authenticated() {
            View::Workspace
        } else {
            View::LoginForm
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_shows_login_form() {
        let session = Session::default();
        assert!(!session.is_authenticated());
        assert_eq!(session.view(), View::LoginForm);
    }

    #[test]
    fn logout_resets_flag_and_shows_login_form() {
        let mut session = Session::default();
        session.login(Credentials::new("user1", "securepass"));
        assert!(session.is_authenticated());
        assert_eq!(session.view(), View::Workspace);

        session.logout();
        assert!(!session.is_authenticated());
        assert!(session.credentials().is_none());
        assert_eq!(session.view(), View::LoginForm);
    }

    #[test]
    fn only_the_latest_prediction_is_accepted() {
        let mut session = Session::default();
        session.login(Credentials::new("user1", "securepass"));
        session.begin_prediction(1);
        session.begin_prediction(2);

        assert!(!session.finish_prediction(1));
        assert!(session.finish_prediction(2));
        assert!(!session.finish_prediction(2));
    }

    #[test]
    fn replies_after_clear_or_logout_are_dropped() {
        let mut session = Session::default();
        session.login(Credentials::new("user1", "securepass"));
        session.begin_prediction(7);
        session.cancel_prediction();
        assert!(!session.finish_prediction(7));

        session.begin_prediction(8);
        session.logout();
        session.login(Credentials::new("user1", "securepass"));
        assert!(!session.finish_prediction(8));
    }
}
