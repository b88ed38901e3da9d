use crate::{
    api::{attendance, employee, summary, upload},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    // Uploads and backfills are limited more tightly than dashboard reads.
    let write_limiter = Arc::new(build_limiter(config.rate_upload_per_min));
    let read_limiter = Arc::new(build_limiter(config.rate_api_per_min));

    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::resource("/employees")
                    .wrap(read_limiter.clone())
                    .route(web::get().to(employee::list_employees)),
            )
            .service(
                web::resource("/attendance")
                    .wrap(read_limiter.clone())
                    .route(web::get().to(attendance::daily_attendance)),
            )
            .service(
                web::resource("/employee-summary")
                    .wrap(read_limiter.clone())
                    .route(web::get().to(summary::employee_summary)),
            )
            .service(
                web::resource("/monthly-summary")
                    .wrap(read_limiter.clone())
                    .route(web::get().to(summary::monthly_summary)),
            )
            .service(
                web::resource("/upload")
                    .wrap(write_limiter.clone())
                    .route(web::post().to(upload::upload_attendance)),
            )
            .service(
                web::resource("/generate-missing-attendance")
                    .wrap(write_limiter.clone())
                    .route(web::post().to(attendance::generate_missing)),
            ),
    );
}
