// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 图片校验集成测试
///
/// 使用 wiremock 模拟图片服务器，验证真实的 HEAD 探测
#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use wikimg::engines::validators::{HttpImageProbe, ImageValidator};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn validator_for(server: &MockServer) -> ImageValidator {
        ImageValidator::new(
            Arc::new(HttpImageProbe::new().unwrap()),
            server.uri(),
            "/w/images/",
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_accepts_png_with_200() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/images/Stone.png"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-type", "image/png"))
            .expect(1)
            .mount(&server)
            .await;

        let validator = validator_for(&server).await;
        let candidate = format!("{}/images/Stone.png?format=original", server.uri());
        assert!(validator.validate(&candidate).await);
    }

    #[tokio::test]
    async fn test_rejects_404_and_html() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/images/Missing.png"))
            .respond_with(ResponseTemplate::new(404).insert_header("content-type", "image/png"))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/w/Stone"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
            .mount(&server)
            .await;

        let validator = validator_for(&server).await;
        assert!(!validator.validate(&format!("{}/images/Missing.png", server.uri())).await);
        assert!(!validator.validate(&format!("{}/w/Stone", server.uri())).await);
    }

    #[tokio::test]
    async fn test_does_not_follow_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/images/Old.png"))
            .respond_with(
                ResponseTemplate::new(301)
                    .insert_header("location", format!("{}/images/New.png", server.uri()).as_str()),
            )
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/images/New.png"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-type", "image/png"))
            .mount(&server)
            .await;

        let validator = validator_for(&server).await;
        assert!(!validator.validate(&format!("{}/images/Old.png", server.uri())).await);
    }

    #[tokio::test]
    async fn test_thumbnail_checked_at_original_path() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/w/images/Anvil.svg"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-type", "image/svg+xml"))
            .expect(1)
            .mount(&server)
            .await;

        let validator = validator_for(&server).await;
        let thumbnail = format!("{}/images/thumb/Anvil.svg/150px-Anvil.svg?7c1a", server.uri());
        assert_eq!(
            validator.normalize(&thumbnail).unwrap(),
            format!("{}/w/images/Anvil.svg", server.uri())
        );
        assert!(validator.validate(&thumbnail).await);
    }

    #[tokio::test]
    async fn test_slow_server_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/images/Slow.png"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/png")
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let validator = ImageValidator::new(
            Arc::new(HttpImageProbe::new().unwrap()),
            server.uri(),
            "/w/images/",
            Duration::from_millis(50),
        );
        assert!(!validator.validate(&format!("{}/images/Slow.png", server.uri())).await);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_rejected() {
        let validator = ImageValidator::new(
            Arc::new(HttpImageProbe::new().unwrap()),
            "http://127.0.0.1:1",
            "/w/images/",
            Duration::from_secs(1),
        );
        assert!(!validator.validate("http://127.0.0.1:1/images/Stone.png").await);
    }
}
