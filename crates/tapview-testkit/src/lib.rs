// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use tapview_app::{RequestData, ResponseData};

const HOSTS: [&str; 10] = [
    "app.example.com",
    "api.example.com",
    "cdn.example.com",
    "login.example.org",
    "static.example.org",
    "shop.example.net",
    "tracker.adnet.io",
    "fonts.webtype.dev",
    "img.mirror.co",
    "beta.example.com",
];

const PATHS: [&str; 12] = [
    "/",
    "/index.html",
    "/assets/app.js",
    "/assets/app.css",
    "/img/logo.png",
    "/img/banner.gif",
    "/api/v1/users",
    "/api/v1/session",
    "/fonts/inter.woff2",
    "/favicon.ico",
    "/search?q=widgets",
    "/checkout/cart",
];

const METHODS: [&str; 5] = ["GET", "POST", "PUT", "DELETE", "HEAD"];

const STATUSES: [u16; 10] = [200, 201, 204, 301, 302, 304, 400, 403, 404, 500];

const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (X11; Linux x86_64)",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)",
    "curl/8.5.0",
    "python-requests/2.31",
];

const RESPONSE_BODIES: [&str; 5] = [
    "<!doctype html><html><body>ok</body></html>",
    "{\"status\":\"ok\"}",
    "{\"error\":\"not found\"}",
    "binary-payload-elided",
    "",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Deterministic generator of plausible intercepted traffic. The same seed
/// always yields the same sequence of exchanges.
#[derive(Debug, Clone)]
pub struct TrafficFaker {
    rng: DeterministicRng,
}

impl TrafficFaker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: DeterministicRng::new(if seed == 0 { 1 } else { seed }),
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn request(&mut self) -> RequestData {
        let host = self.pick(&HOSTS);
        let method = self.pick(&METHODS);
        let path = self.pick(&PATHS);
        request_for(host, method, path)
    }

    pub fn request_for_host(&mut self, host: &str) -> RequestData {
        let method = self.pick(&METHODS);
        let path = self.pick(&PATHS);
        request_for(host, method, path)
    }

    pub fn response(&mut self) -> ResponseData {
        let status = STATUSES[self.rng.int_n(STATUSES.len())];
        self.response_with_status(status)
    }

    pub fn response_with_status(&mut self, status: u16) -> ResponseData {
        let body = self.pick(&RESPONSE_BODIES);
        response_for(status, body)
    }

    /// A completed exchange: request plus a matching response.
    pub fn exchange(&mut self) -> (RequestData, ResponseData) {
        let request = self.request();
        let response = self.response();
        (request, response)
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }
}

pub fn request_for(host: &str, method: &str, path: &str) -> RequestData {
    let raw = format!(
        "{method} {path} HTTP/1.1\r\nHost: {host}\r\nUser-Agent: {}\r\nAccept: */*\r\n\r\n",
        USER_AGENTS[0],
    );
    RequestData::new(host, method, path, raw)
}

pub fn response_for(status: u16, body: &str) -> ResponseData {
    let raw = format!(
        "HTTP/1.1 {status} {}\r\nContent-Length: {}\r\n\r\n{body}",
        reason_phrase(status),
        body.len(),
    );
    ResponseData::new(status, raw)
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
