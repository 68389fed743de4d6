//! Configuration stubs shipped with the binary.

use super::{Placeholder, Template};

/// Global `nginx.conf`.
pub const NGINX_CONF: Template = Template {
    name: "nginx.conf",
    body: include_str!("../../stubs/nginx.conf"),
    placeholders: &[Placeholder::User, Placeholder::HomePath],
};

/// The manager's own catch-all server block.
pub const VALET_CONF: Template = Template {
    name: "valet.conf",
    body: include_str!("../../stubs/valet.conf"),
    placeholders: &[
        Placeholder::HomePath,
        Placeholder::ServerPath,
        Placeholder::StaticPrefix,
    ],
};

/// Written verbatim.
pub const FASTCGI_PARAMS: Template = Template {
    name: "fastcgi_params",
    body: include_str!("../../stubs/fastcgi_params"),
    placeholders: &[],
};

/// Per-site TLS server block.
pub const SECURE_SITE_CONF: Template = Template {
    name: "secure.valet.conf",
    body: include_str!("../../stubs/secure.valet.conf"),
    placeholders: &[
        Placeholder::Site,
        Placeholder::Cert,
        Placeholder::Key,
        Placeholder::HomePath,
        Placeholder::ServerPath,
        Placeholder::StaticPrefix,
    ],
};

pub const ALL: [Template; 4] = [NGINX_CONF, VALET_CONF, FASTCGI_PARAMS, SECURE_SITE_CONF];
