use storefront_core::identity::{self, AccountError, Registration, UserAccount};
use storefront_core::Notice;
use storefront_store::update_users;
use tracing::info;
use crate::error::AppResult;
use crate::state::AppState;

/// Sign in and remember the session.
pub fn login(state: &AppState, username: &str, password: &str) -> AppResult<Notice> {
    let users = state.users.users()?;
    let user = identity::authenticate(&users, username, password)?;

    state.session.sign_in(&user.username)?;
    info!("User {} signed in", user.username);
    Ok(Notice::success("Signed in"))
}

pub fn logout(state: &AppState) -> AppResult<Notice> {
    state.session.sign_out()?;
    Ok(Notice::info("Signed out"))
}

pub fn register(state: &AppState, form: Registration) -> AppResult<Notice> {
    let now = state.now();
    update_users(&*state.users, |users| -> AppResult<()> {
        Ok(identity::register(users, form, now)?)
    })?;
    Ok(Notice::success("Account created, please sign in"))
}

/// The signed-in account, if the session still points at an existing user.
pub fn current_user(state: &AppState) -> AppResult<Option<UserAccount>> {
    let Some(username) = state.session.current_user()? else {
        return Ok(None);
    };
    let users = state.users.users()?;
    Ok(users.into_iter().find(|u| u.username == username))
}

/// Username of the signed-in user, or `NotSignedIn`.
pub(crate) fn require_session(state: &AppState) -> AppResult<String> {
    Ok(state.session.current_user()?.ok_or(AccountError::NotSignedIn)?)
}

/// The signed-in account for a change: it must exist and not be locked.
pub(crate) fn active_user_mut<'a>(users: &'a mut [UserAccount], username: &str) -> Result<&'a mut UserAccount, AccountError> {
    let user = identity::find_user_mut(users, username).map_err(|_| AccountError::NotSignedIn)?;
    if user.locked {
        return Err(AccountError::Locked(user.username.clone()));
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::NoticeLevel;
    use storefront_shared::Masked;

    #[test]
    fn test_login_and_logout() {
        let state = AppState::in_memory(Vec::new()).unwrap();
        assert!(current_user(&state).unwrap().is_none());

        login(&state, "user1", "123456").unwrap();
        assert_eq!(current_user(&state).unwrap().unwrap().username, "user1");

        logout(&state).unwrap();
        assert!(current_user(&state).unwrap().is_none());
    }

    #[test]
    fn test_wrong_password_is_rejected() {
        let state = AppState::in_memory(Vec::new()).unwrap();
        let notice = login(&state, "user1", "nope").unwrap_err().into_notice();
        assert_eq!(notice.level, NoticeLevel::Danger);
        assert!(current_user(&state).unwrap().is_none());
    }

    #[test]
    fn test_register_then_login() {
        let state = AppState::in_memory(Vec::new()).unwrap();
        register(
            &state,
            Registration {
                username: "minh".to_string(),
                password: Masked::new("pw".to_string()),
                email: "minh@email.com".to_string(),
                full_name: "Minh".to_string(),
            },
        )
        .unwrap();

        login(&state, "minh", "pw").unwrap();
        assert_eq!(current_user(&state).unwrap().unwrap().email, "minh@email.com");
    }
}
