use std::time::Duration;

use server::recognition::{Candidate, FindOutput, MatcherError, SPOOF_MESSAGE};

use crate::common::{MAX_UPLOAD_SIZE, TestApp};

const PHOTO: &[u8] = b"\xFF\xD8\xFF\xE0JFIF-test-photo";

mod identify_success {
    use super::*;

    #[tokio::test]
    async fn seeded_ceo_is_identified() {
        let app = TestApp::spawn().await;
        app.matcher
            .match_reference("photos_db/10000000_office.jpg");

        let res = app.identify("me.jpg", PHOTO.to_vec()).await;

        assert_eq!(res.status, 200, "unexpected body: {}", res.text);
        assert_eq!(res.body["status"], "success");
        let user = &res.body["user"];
        assert_eq!(user["id"], "10000000");
        assert_eq!(user["name"], "Гырдымов Антон Вячеславович");
        assert_eq!(user["position"], "CEO");
        assert_eq!(user["department"], "Не указан");

        // YYYY-MM-DD HH:MM
        let last_seen = user["last_seen"].as_str().unwrap();
        assert_eq!(last_seen.len(), 16);
        assert_eq!(&last_seen[4..5], "-");
        assert_eq!(&last_seen[10..11], " ");
        assert_eq!(&last_seen[13..14], ":");
    }

    #[tokio::test]
    async fn single_row_answer_is_identified() {
        let app = TestApp::spawn().await;
        app.matcher.answer_with(|_| {
            Ok(FindOutput::Row(Candidate {
                identity: "photos_db/10000001.jpg".into(),
                distance: None,
            }))
        });

        let res = app.identify("photo.png", PHOTO.to_vec()).await;

        assert_eq!(res.status, 200, "unexpected body: {}", res.text);
        assert_eq!(res.body["user"]["id"], "10000001");
        assert_eq!(res.body["user"]["position"], "Менеджер");
    }

    #[tokio::test]
    async fn live_flag_with_candidate_is_identified() {
        let app = TestApp::spawn().await;
        app.matcher.answer_with(|_| {
            Ok(FindOutput::Flagged {
                is_real: true,
                candidate: Some(Candidate {
                    identity: "10000002_side.jpeg".into(),
                    distance: Some(0.3),
                }),
            })
        });

        let res = app.identify("photo.jpeg", PHOTO.to_vec()).await;

        assert_eq!(res.status, 200, "unexpected body: {}", res.text);
        assert_eq!(res.body["user"]["name"], "Сидорова Анна Михайловна");
    }

    #[tokio::test]
    async fn uppercase_extension_is_accepted() {
        let app = TestApp::spawn().await;
        app.matcher.match_reference("photos_db/10000000.jpg");

        let res = app.identify("CAMERA.JPG", PHOTO.to_vec()).await;

        assert_eq!(res.status, 200, "unexpected body: {}", res.text);
        assert_eq!(app.matcher.calls().len(), 1);
    }

    #[tokio::test]
    async fn matcher_sees_stored_upload() {
        let app = TestApp::spawn().await;
        app.matcher.match_reference("photos_db/10000000.jpg");

        app.identify("me.png", PHOTO.to_vec()).await;

        let calls = app.matcher.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].existed, "upload must exist while matching");
        assert!(calls[0].image_path.starts_with(&app.upload_dir));
        assert_eq!(calls[0].image_path.extension().unwrap(), "png");
    }
}

mod identify_validation {
    use super::*;

    #[tokio::test]
    async fn disallowed_extensions_are_rejected_before_matching() {
        let app = TestApp::spawn().await;

        for name in ["face.gif", "face", "face.", "face.jpg.txt", "scan.pdf", "face.bmp"] {
            let res = app.identify(name, PHOTO.to_vec()).await;
            assert_eq!(res.status, 400, "{name} should be rejected");
            assert_eq!(res.body["code"], "VALIDATION_ERROR");
            assert_eq!(res.body["error"], "Неподдерживаемый формат файла");
        }

        assert!(app.matcher.calls().is_empty());
        assert!(app.leftover_uploads().is_empty());
    }

    #[tokio::test]
    async fn missing_photo_field_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.identify_without_photo().await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["status"], "error");
        assert_eq!(res.body["error"], "Файл не загружен");
        assert!(app.matcher.calls().is_empty());
    }

    #[tokio::test]
    async fn photo_without_filename_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.identify_without_filename().await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["error"], "Файл не загружен");
        assert!(app.matcher.calls().is_empty());
    }

    #[tokio::test]
    async fn oversized_photo_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .identify("big.jpg", vec![0u8; MAX_UPLOAD_SIZE as usize + 1])
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert!(app.matcher.calls().is_empty());
        assert!(app.leftover_uploads().is_empty());
    }

    #[tokio::test]
    async fn non_numeric_reference_is_bad_request() {
        let app = TestApp::spawn().await;
        app.matcher.match_reference("photos_db/abc.jpg");

        let res = app.identify("me.jpg", PHOTO.to_vec()).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["error"], "Неверный формат ID");
    }
}

mod identify_rejections {
    use super::*;

    #[tokio::test]
    async fn spoof_error_is_forbidden() {
        let app = TestApp::spawn().await;
        app.matcher.answer_with(|_| {
            Err(MatcherError::Spoof(
                "Spoof detected in the given image.".into(),
            ))
        });

        let res = app.identify("me.jpg", PHOTO.to_vec()).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "SPOOF_DETECTED");
        assert_eq!(res.body["error"], SPOOF_MESSAGE);
        assert!(res.body.get("user").is_none());
    }

    #[tokio::test]
    async fn spoof_flag_is_forbidden() {
        let app = TestApp::spawn().await;
        app.matcher.answer_with(|_| {
            Ok(FindOutput::Flagged {
                is_real: false,
                candidate: Some(Candidate {
                    identity: "photos_db/10000000.jpg".into(),
                    distance: Some(0.05),
                }),
            })
        });

        let res = app.identify("me.jpg", PHOTO.to_vec()).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["error"], SPOOF_MESSAGE);
    }

    #[tokio::test]
    async fn no_match_is_not_found_without_profile_data() {
        let app = TestApp::spawn().await;
        app.matcher
            .answer_with(|_| Ok(FindOutput::Tables(vec![vec![]])));

        let res = app.identify("stranger.jpg", PHOTO.to_vec()).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
        assert_eq!(res.body["error"], "Пользователь не найден");
        assert!(res.body.get("user").is_none());
        assert!(!res.text.contains("1000000"));
    }

    #[tokio::test]
    async fn matcher_failure_looks_like_no_match() {
        let app = TestApp::spawn().await;

        app.matcher
            .answer_with(|_| Ok(FindOutput::Table(vec![])));
        let no_match = app.identify("a.jpg", PHOTO.to_vec()).await;

        app.matcher.answer_with(|_| {
            Err(MatcherError::Backend(
                "Face could not be detected in numpy array".into(),
            ))
        });
        let failure = app.identify("a.jpg", PHOTO.to_vec()).await;

        assert_eq!(no_match.status, 404);
        assert_eq!(failure.status, 404);
        assert_eq!(no_match.body, failure.body);
    }

    #[tokio::test]
    async fn reference_without_profile_is_not_found() {
        let app = TestApp::spawn().await;
        app.matcher.match_reference("photos_db/10000009_new_hire.jpg");

        let res = app.identify("me.jpg", PHOTO.to_vec()).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["error"], "Данные пользователя не найдены");
    }

    #[tokio::test]
    async fn id_beyond_32_bits_is_not_found() {
        let app = TestApp::spawn().await;
        app.matcher.match_reference("photos_db/99999999999.jpg");

        let res = app.identify("me.jpg", PHOTO.to_vec()).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["error"], "Данные пользователя не найдены");
    }
}

mod temp_file_lifecycle {
    use super::*;

    #[tokio::test]
    async fn upload_is_removed_after_every_outcome() {
        let app = TestApp::spawn().await;

        let outcomes: Vec<(u16, Box<dyn Fn(&TestApp)>)> = vec![
            (
                200,
                Box::new(|app: &TestApp| app.matcher.match_reference("photos_db/10000000.jpg")),
            ),
            (
                404,
                Box::new(|app: &TestApp| app.matcher.answer_with(|_| Ok(FindOutput::Empty))),
            ),
            (
                404,
                Box::new(|app: &TestApp| {
                    app.matcher
                        .answer_with(|_| Err(MatcherError::Decode("not json".into())))
                }),
            ),
            (
                403,
                Box::new(|app: &TestApp| {
                    app.matcher
                        .answer_with(|_| Err(MatcherError::Spoof("fake".into())))
                }),
            ),
            (
                400,
                Box::new(|app: &TestApp| app.matcher.match_reference("photos_db/xyz.jpg")),
            ),
            (
                404,
                Box::new(|app: &TestApp| app.matcher.match_reference("photos_db/20000000.jpg")),
            ),
        ];

        for (expected, script) in &outcomes {
            script(&app);
            let res = app.identify("me.jpg", PHOTO.to_vec()).await;
            assert_eq!(res.status, *expected, "unexpected body: {}", res.text);
        }

        let calls = app.matcher.calls();
        assert_eq!(calls.len(), outcomes.len());
        for call in &calls {
            assert!(call.existed);
            assert!(!call.image_path.exists(), "{:?} left behind", call.image_path);
        }
        assert!(app.leftover_uploads().is_empty());
    }

    #[tokio::test]
    async fn client_disconnect_during_recognition_removes_upload() {
        let app = TestApp::spawn().await;
        app.matcher.match_reference("photos_db/10000000.jpg");
        app.matcher.delay_by(Duration::from_secs(5));

        let result = app
            .identify_with_timeout("me.jpg", PHOTO.to_vec(), Duration::from_millis(300))
            .await;
        assert!(result.is_err(), "request should time out");

        let calls = app.matcher.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].existed);

        // The matcher is still sleeping, so only the abandoned handler can clean up.
        let mut leftovers = app.leftover_uploads();
        for _ in 0..30 {
            if leftovers.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
            leftovers = app.leftover_uploads();
        }
        assert!(leftovers.is_empty(), "upload left behind: {leftovers:?}");
    }

    #[tokio::test]
    async fn concurrent_requests_use_distinct_files() {
        let app = TestApp::spawn().await;
        app.matcher.match_reference("photos_db/10000001.jpg");

        let requests = (0..8).map(|_| app.identify("me.jpg", PHOTO.to_vec()));
        let responses = futures::future::join_all(requests).await;

        assert!(responses.iter().all(|r| r.status == 200));
        let calls = app.matcher.calls();
        let unique: std::collections::HashSet<_> =
            calls.iter().map(|c| c.image_path.clone()).collect();
        assert_eq!(unique.len(), calls.len());
        assert!(app.leftover_uploads().is_empty());
    }
}
