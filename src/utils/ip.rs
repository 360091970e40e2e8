//! IP 地址处理工具
//!
//! 提供：
//! - IP 字面量语法校验（IPv4 点分十进制 / IPv6，可带 zone 后缀）
//! - 私有地址检测
//! - 从边缘平台注入的请求头中提取客户端 IP

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use actix_web::http::header::HeaderMap;

/// 校验字符串是否为合法的 IP 字面量
///
/// - IPv4：四段十进制，每段 0-255，不允许前导零
/// - IPv6：任意合法写法（含 `::` 压缩与内嵌 IPv4）
/// - zone 后缀（`%eth0`）只允许出现在 IPv6 上，且必须是非空字母数字
///
/// 只做完整匹配，像 `1.2.3.4abc` 这样“包含”地址的字符串一律拒绝。
pub fn is_valid_ip_literal(s: &str) -> bool {
    let (addr, zone) = match s.split_once('%') {
        Some((addr, zone)) => (addr, Some(zone)),
        None => (s, None),
    };

    if addr.contains(':') {
        if let Some(zone) = zone
            && (zone.is_empty() || !zone.chars().all(|c| c.is_ascii_alphanumeric()))
        {
            return false;
        }
        addr.parse::<Ipv6Addr>().is_ok()
    } else {
        zone.is_none() && addr.parse::<Ipv4Addr>().is_ok()
    }
}

/// Parse an IP literal, dropping any IPv6 zone suffix.
pub fn parse_ip_literal(s: &str) -> Option<IpAddr> {
    if !is_valid_ip_literal(s) {
        return None;
    }
    let addr = s.split('%').next().unwrap_or(s);
    addr.parse().ok()
}

/// 检查 IP 是否为私有地址或 localhost
///
/// IPv4-mapped IPv6（`::ffff:10.0.0.1`）按内嵌的 IPv4 判断
pub fn is_private_or_local(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_private_v4(v4),
        IpAddr::V6(v6) => {
            if let Some(v4) = v6.to_ipv4_mapped() {
                return is_private_v4(&v4);
            }
            // IPv6 私有地址：
            // - fc00::/7 (ULA, RFC 4193)
            // - fe80::/10 (Link-local)
            // - ::1 / ::
            v6.is_loopback()
                || v6.is_unspecified()
                || (v6.segments()[0] & 0xfe00) == 0xfc00
                || (v6.segments()[0] & 0xffc0) == 0xfe80
        }
    }
}

fn is_private_v4(v4: &Ipv4Addr) -> bool {
    v4.is_private() || v4.is_loopback() || v4.is_link_local() || v4.is_unspecified()
}

/// 从请求头与连接地址提取客户端 IP
///
/// 策略（按优先级）：
/// 1. 边缘平台注入的 connecting-ip 头（如 `CF-Connecting-IP`）
/// 2. X-Forwarded-For 第一个地址
/// 3. X-Real-IP
/// 4. 连接的 peer 地址
pub fn extract_client_ip_from_headers(
    headers: &HeaderMap,
    connecting_ip_header: &str,
    peer_addr: Option<SocketAddr>,
) -> Option<String> {
    header_str(headers, connecting_ip_header)
        .map(String::from)
        .or_else(|| extract_forwarded_ip_from_headers(headers))
        .or_else(|| peer_addr.map(|addr| addr.ip().to_string()))
}

/// 从 HeaderMap 提取转发的 IP（X-Forwarded-For 或 X-Real-IP）
pub fn extract_forwarded_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    header_str(headers, "x-forwarded-for")
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .or_else(|| header_str(headers, "x-real-ip").map(String::from))
}

/// Non-empty, trimmed, UTF-8 header value.
pub(crate) fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
