use commission_core::ServiceError;

/// Cross-check the request's claimed MAC against the transport-derived
/// client certificate subject.
///
/// The terminating proxy embeds the certificate-bound MAC somewhere in
/// the forwarded `X-SSL-Subject` value, so the check is case-sensitive
/// substring containment over the raw undelimited MAC. That tolerates
/// surrounding subject fields (`MAC=aabbccddeeff,O=Acme`) but is looser
/// than an exact-field comparison; it matches the trust model the
/// deployed proxies were set up for, and it is NOT cryptographic
/// equality. Swap the `contains` call for a field parse if the proxy
/// fleet ever forwards a structured subject.
///
/// With `enabled` false the check is skipped entirely — device identity
/// is then unenforced, which the binary announces loudly at startup.
pub fn check_client_subject(
    mac_address: &str,
    ssl_subject: Option<&str>,
    enabled: bool,
) -> Result<(), ServiceError> {
    if !enabled {
        return Ok(());
    }

    let subject = ssl_subject.ok_or_else(|| {
        ServiceError::PermissionDenied("missing X-SSL-Subject header".to_owned())
    })?;

    if subject.contains(mac_address) {
        Ok(())
    } else {
        Err(ServiceError::PermissionDenied(format!(
            "mac address {mac_address} not present in client certificate subject"
        )))
    }
}
