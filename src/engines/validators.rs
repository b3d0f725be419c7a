// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::net::IpAddr;
use thiserror::Error;
use url::{Host, Url};

/// URL 校验错误
#[derive(Error, Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("url is required")]
    Missing,
    #[error("invalid url: {0}")]
    Malformed(String),
    #[error("invalid url scheme `{0}`, expected http or https")]
    UnsupportedScheme(String),
    #[error("invalid url: missing host")]
    MissingHost,
    #[error("invalid url: {0} is not a public address")]
    PrivateHost(String),
}

/// 校验请求 URL
///
/// 要求是带主机名的绝对 http(s) 地址。主机为 localhost 或私有网段的
/// IP 字面量时直接拒绝，避免借站点令牌（例如 `http://10.0.0.1/?amazon`）
/// 让浏览器访问内网。这里不做 DNS 解析。
///
/// # 参数
///
/// * `raw` - 调用方传入的原始字符串
///
/// # 返回值
///
/// * `Ok(Url)` - 解析后的地址
/// * `Err(UrlValidationError)` - 缺失、格式错误或指向内网
pub fn validate_url(raw: &str) -> Result<Url, UrlValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(UrlValidationError::Missing);
    }

    let url = Url::parse(raw).map_err(|e| UrlValidationError::Malformed(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlValidationError::UnsupportedScheme(other.to_string())),
    }

    match url.host() {
        None => return Err(UrlValidationError::MissingHost),
        Some(Host::Domain(domain)) => {
            if domain.eq_ignore_ascii_case("localhost") {
                return Err(UrlValidationError::PrivateHost(domain.to_string()));
            }
        }
        Some(Host::Ipv4(ip)) => {
            if is_private_ip(IpAddr::V4(ip)) {
                return Err(UrlValidationError::PrivateHost(ip.to_string()));
            }
        }
        Some(Host::Ipv6(ip)) => {
            if is_private_ip(IpAddr::V6(ip)) {
                return Err(UrlValidationError::PrivateHost(ip.to_string()));
            }
        }
    }

    Ok(url)
}

fn is_private_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => {
            let octets = ipv4.octets();
            ipv4.is_loopback()
                || ipv4.is_unspecified()
                || ipv4.is_link_local()
                // 10.0.0.0/8
                || octets[0] == 10
                // 100.64.0.0/10 (CGNAT)
                || (octets[0] == 100 && (64..=127).contains(&octets[1]))
                // 172.16.0.0/12
                || (octets[0] == 172 && (16..=31).contains(&octets[1]))
                // 192.168.0.0/16
                || (octets[0] == 192 && octets[1] == 168)
                // 224.0.0.0/4
                || (224..=239).contains(&octets[0])
        }
        IpAddr::V6(ipv6) => {
            // ::ffff:a.b.c.d reaches the IPv4 host
            if let Some(ipv4) = ipv6.to_ipv4_mapped() {
                return is_private_ip(IpAddr::V4(ipv4));
            }

            let first = ipv6.segments()[0];
            ipv6.is_loopback()
                || ipv6.is_unspecified()
                // fc00::/7
                || (first & 0xfe00) == 0xfc00
                // fe80::/10
                || (first & 0xffc0) == 0xfe80
                // ff00::/8
                || (first & 0xff00) == 0xff00
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_accepts_absolute_http() {
        let url = validate_url("https://www.amazon.example/dp/123").unwrap();
        assert_eq!(url.host_str(), Some("www.amazon.example"));
        assert!(validate_url("  http://www.mediamarkt.es/p  ").is_ok());
    }

    #[test]
    fn test_validate_url_rejects_missing_and_malformed() {
        assert_eq!(validate_url(""), Err(UrlValidationError::Missing));
        assert_eq!(validate_url("   "), Err(UrlValidationError::Missing));
        assert!(matches!(
            validate_url("amazon/dp/123"),
            Err(UrlValidationError::Malformed(_))
        ));
        assert!(matches!(
            validate_url("ftp://amazon.example/file"),
            Err(UrlValidationError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            validate_url("file:///tmp/amazon.html"),
            Err(UrlValidationError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_validate_url_ssrf() {
        assert!(matches!(
            validate_url("http://localhost/?amazon"),
            Err(UrlValidationError::PrivateHost(_))
        ));
        assert!(matches!(
            validate_url("http://127.0.0.1/amazon"),
            Err(UrlValidationError::PrivateHost(_))
        ));
        assert!(matches!(
            validate_url("http://[::1]/amazon"),
            Err(UrlValidationError::PrivateHost(_))
        ));
        assert!(validate_url("http://8.8.8.8/amazon").is_ok());
    }

    #[test]
    fn test_validate_url_rejects_mapped_and_shared_addresses() {
        assert!(matches!(
            validate_url("http://[::ffff:127.0.0.1]/amazon"),
            Err(UrlValidationError::PrivateHost(_))
        ));
        assert!(matches!(
            validate_url("http://[::ffff:10.0.0.1]/amazon"),
            Err(UrlValidationError::PrivateHost(_))
        ));
        assert!(matches!(
            validate_url("http://100.64.0.1/amazon"),
            Err(UrlValidationError::PrivateHost(_))
        ));
        assert!(validate_url("http://[::ffff:8.8.8.8]/amazon").is_ok());
        assert!(validate_url("http://100.128.0.1/amazon").is_ok());
    }

    #[test]
    fn test_is_private_ip() {
        assert!(is_private_ip("127.0.0.1".parse().unwrap()));
        assert!(is_private_ip("10.0.0.1".parse().unwrap()));
        assert!(is_private_ip("192.168.1.1".parse().unwrap()));
        assert!(is_private_ip("172.16.0.1".parse().unwrap()));
        assert!(is_private_ip("fd00::1".parse().unwrap()));
        assert!(!is_private_ip("8.8.8.8".parse().unwrap()));
        assert!(!is_private_ip("172.32.0.1".parse().unwrap()));
        assert!(is_private_ip("100.127.255.254".parse().unwrap()));
        assert!(!is_private_ip("100.63.255.255".parse().unwrap()));
        assert!(is_private_ip("::ffff:192.168.1.1".parse().unwrap()));
        assert!(!is_private_ip("::ffff:1.1.1.1".parse().unwrap()));
    }
}
