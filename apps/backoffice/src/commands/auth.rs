//! # Auth Commands
//!
//! Forms are validated here; the [`IdentityProvider`](crate::IdentityProvider)
//! only ever sees well-formed credentials.

use tracing::{debug, info};

use crate::error::ApiError;
use crate::identity::Session;
use crate::Backoffice;
use bizdesk_core::validation::{validate_sign_in, validate_sign_up, RawFields};

pub async fn sign_in(app: &Backoffice, raw: &RawFields) -> Result<Session, ApiError> {
    debug!("sign_in command");

    let credentials = validate_sign_in(raw)?;
    let session = app.identity().sign_in(&credentials).await?;

    info!(user_id = %session.user_id, "sign_in done");
    Ok(session)
}

pub async fn sign_up(app: &Backoffice, raw: &RawFields) -> Result<Session, ApiError> {
    debug!("sign_up command");

    let credentials = validate_sign_up(raw)?;
    let session = app.identity().sign_up(&credentials).await?;

    info!(user_id = %session.user_id, "sign_up done");
    Ok(session)
}

pub async fn sign_out(app: &Backoffice, session: &Session) -> Result<(), ApiError> {
    debug!(user_id = %session.user_id, "sign_out command");

    app.identity().sign_out(session).await?;
    Ok(())
}
