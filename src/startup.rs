use actix_web::dev::Server;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;

use crate::auth::RefreshTokenManager;
use crate::configuration::AuthSettings;
use crate::middleware::AccessTokenGuard;
use crate::routes::{health_check, login, me, refresh, revoke};
use crate::store::{RefreshTokenStore, UserStore};

pub fn run(
    listener: TcpListener,
    refresh_store: Arc<dyn RefreshTokenStore>,
    users: Arc<dyn UserStore>,
    auth_settings: AuthSettings,
) -> Result<Server, std::io::Error> {
    auth_settings
        .validate()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
    let horizon = auth_settings
        .refresh_token_horizon()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    let refresh_tokens = web::Data::new(RefreshTokenManager::new(refresh_store).with_horizon(horizon));
    let users: web::Data<dyn UserStore> = web::Data::from(users);
    let signing_secret = auth_settings.signing_secret.clone();
    let auth_settings = web::Data::new(auth_settings);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(refresh_tokens.clone())
            .app_data(users.clone())
            .app_data(auth_settings.clone())
            .route("/api/healthz", web::get().to(health_check))
            .route("/api/login", web::post().to(login))
            .route("/api/refresh", web::post().to(refresh))
            .route("/api/revoke", web::post().to(revoke))
            .service(
                web::resource("/api/me")
                    .wrap(AccessTokenGuard::new(signing_secret.clone()))
                    .route(web::get().to(me)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
