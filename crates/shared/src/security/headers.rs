use actix_web::middleware::DefaultHeaders;

/// Security headers applied to every response: content-type sniffing,
/// clickjacking, legacy XSS auditor, referrer leakage, and DNS prefetch.
pub fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "DENY"))
        .add(("X-XSS-Protection", "0"))
        .add(("Referrer-Policy", "no-referrer"))
        .add(("X-DNS-Prefetch-Control", "off"))
}
