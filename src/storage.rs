use anyhow::Context;
use async_trait::async_trait;
use aws_config::{defaults, BehaviorVersion};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{Builder as S3ConfigBuilder, Region},
    Client,
};
use aws_smithy_types::byte_stream::ByteStream;
use bytes::Bytes;

use crate::config::MediaConfig;
use crate::images::slots::Transform;

/// External media host. Objects are stored raw; resizing happens on delivery,
/// driven by the transform segment of the public URL.
#[async_trait]
pub trait StorageClient: Send + Sync {
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
        transform: &Transform,
    ) -> anyhow::Result<()>;

    fn public_url(&self, key: &str, transform: &Transform) -> String;
}

#[derive(Clone)]
pub struct Storage {
    client: Client,
    bucket: String,
    public_url: String,
}

impl Storage {
    pub async fn new(cfg: &MediaConfig) -> anyhow::Result<Self> {
        let shared = defaults(BehaviorVersion::latest())
            .region(Region::new(cfg.region.clone()))
            .credentials_provider(Credentials::new(
                &cfg.access_key,
                &cfg.secret_key,
                None,
                None,
                "static",
            ))
            .endpoint_url(&cfg.endpoint)
            .load()
            .await;

        let conf = S3ConfigBuilder::from(&shared)
            .endpoint_url(&cfg.endpoint)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: Client::from_conf(conf),
            bucket: cfg.bucket.clone(),
            public_url: cfg.public_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl StorageClient for Storage {
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
        transform: &Transform,
    ) -> anyhow::Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .metadata("transform", transform.to_string())
            .send()
            .await
            .context("s3 put_object")?;
        Ok(())
    }

    fn public_url(&self, key: &str, transform: &Transform) -> String {
        delivery_url(&self.public_url, key, transform)
    }
}

pub(crate) fn delivery_url(base: &str, key: &str, transform: &Transform) -> String {
    format!("{}/{}/{}", base, transform, key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::slots::Slot;

    #[test]
    fn delivery_url_embeds_transform() {
        let t = Slot::Avatar.policy().transform;
        let url = delivery_url("https://media.example.com", "blog/avatar/x.png", &t);
        assert_eq!(
            url,
            "https://media.example.com/w_200,h_200,c_fill,g_face,f_auto/blog/avatar/x.png"
        );
    }
}
