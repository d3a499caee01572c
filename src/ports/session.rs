/// Source of the credentials the playlist store needs for each remote call.
///
/// Values are read per operation and never cached by callers.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    fn access_token(&self) -> Option<String>;

    fn current_user_id(&self) -> Option<String>;

    /// Invalidates the session after credentials were judged unusable.
    fn clean_access(&self);
}

/// Blocking, user-visible notification.
#[cfg_attr(test, mockall::automock)]
pub trait UserAlert: Send + Sync {
    fn alert(&self, message: &str);
}
