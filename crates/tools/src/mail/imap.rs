//! IMAP over implicit TLS (port 993) with async-imap and rustls.

use std::sync::Arc;

use agentwire_config::MailConfig;
use async_trait::async_trait;
use futures::TryStreamExt;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tracing::debug;

use super::{ImapConnector, InboxSession, MailError, MailLogin};

fn transport(e: impl std::fmt::Display) -> MailError {
    MailError::Transport(e.to_string())
}

/// The server must greet before we log in; a closed stream or read error
/// fails the connection here instead of surfacing later as a login error.
fn check_greeting<T>(greeting: std::io::Result<Option<T>>) -> Result<(), MailError> {
    match greeting {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(MailError::Transport(
            "connection closed before server greeting".into(),
        )),
        Err(e) => Err(MailError::Transport(format!("reading server greeting: {e}"))),
    }
}

/// Connects to an IMAPS server such as `imap.gmail.com:993`.
#[derive(Debug, Clone)]
pub struct ImapsConnector {
    host: String,
    port: u16,
}

impl ImapsConnector {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn from_config(config: &MailConfig) -> Self {
        Self::new(&config.imap_host, config.imap_port)
    }

    fn tls_connector() -> Result<TlsConnector, MailError> {
        let roots = RootCertStore {
            roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
        };
        let provider = Arc::new(tokio_rustls::rustls::crypto::ring::default_provider());
        let config = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(transport)?
            .with_root_certificates(roots)
            .with_no_client_auth();
        Ok(TlsConnector::from(Arc::new(config)))
    }
}

#[async_trait]
impl ImapConnector for ImapsConnector {
    async fn open(&self, login: &MailLogin) -> Result<Box<dyn InboxSession>, MailError> {
        let tcp = TcpStream::connect((self.host.as_str(), self.port))
            .await
            .map_err(transport)?;
        let server_name = ServerName::try_from(self.host.clone()).map_err(transport)?;
        let tls = Self::tls_connector()?
            .connect(server_name, tcp)
            .await
            .map_err(transport)?;

        let mut client = async_imap::Client::new(tls);
        check_greeting(client.read_response().await.transpose())?;

        let session = client
            .login(&login.username, &login.password)
            .await
            .map_err(|(e, _)| transport(e))?;
        debug!(host = %self.host, user = %login.username, "IMAP login ok");

        Ok(Box::new(ImapsSession { session }))
    }
}

struct ImapsSession {
    session: async_imap::Session<TlsStream<TcpStream>>,
}

#[async_trait]
impl InboxSession for ImapsSession {
    async fn message_ids(&mut self) -> Result<Vec<u32>, MailError> {
        self.session.select("INBOX").await.map_err(transport)?;
        let found = self
            .session
            .search("ALL")
            .await
            .map_err(|e| MailError::Transport(format!("IMAP search failed: {e}")))?;

        let mut ids: Vec<u32> = found.into_iter().collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn fetch_raw(&mut self, id: u32) -> Result<Option<Vec<u8>>, MailError> {
        let fetches: Vec<_> = self
            .session
            .fetch(id.to_string(), "RFC822")
            .await
            .map_err(transport)?
            .try_collect()
            .await
            .map_err(transport)?;

        Ok(fetches
            .iter()
            .find_map(|fetch| fetch.body().map(<[u8]>::to_vec)))
    }

    async fn logout(&mut self) -> Result<(), MailError> {
        self.session.logout().await.map_err(transport)
    }
}
