#[cfg(test)]
mod tests {
    use crate::db::{
        count_challenges, count_resource_roles, count_resources, create_resource,
        find_duplicate_resources, get_challenge, get_resource, get_resources_for_challenge,
        upsert_challenge, upsert_resource_role,
    };
    use crate::error::SeedError;
    use crate::models::{ChallengeStatus, NewResourceRole, UpsertOutcome};
    use crate::test::utils::test_utils::{
        TestDbBuilder, new_challenge, new_resource, setup_test_db,
    };
    use uuid::Uuid;

    #[tokio::test]
    async fn test_upsert_challenge_creates_row() {
        let pool = setup_test_db().await;
        let id = Uuid::new_v4();

        let upserted = upsert_challenge(&pool, &new_challenge(id, "Marathon"))
            .await
            .expect("Failed to upsert challenge");

        assert_eq!(upserted.outcome, UpsertOutcome::Created);
        assert_eq!(upserted.row.id, id);
        assert_eq!(upserted.row.name, "Marathon");
        assert_eq!(upserted.row.status, ChallengeStatus::New);
        assert_eq!(upserted.row.created_by, "tester");
    }

    #[tokio::test]
    async fn test_upsert_existing_challenge_leaves_fields_unchanged() {
        let id = Uuid::new_v4();
        let test_db = TestDbBuilder::new()
            .challenge(id, "Marathon")
            .build()
            .await
            .expect("Failed to build test database");

        let mut changed = new_challenge(id, "Sprint");
        changed.status = ChallengeStatus::Active;
        changed.description = "Changed".to_string();

        let upserted = upsert_challenge(&test_db.pool, &changed)
            .await
            .expect("Failed to upsert challenge");

        assert_eq!(upserted.outcome, UpsertOutcome::Existing);
        assert_eq!(upserted.row.name, "Marathon");
        assert_eq!(upserted.row.description, "Description of Marathon");
        assert_eq!(upserted.row.status, ChallengeStatus::New);
        assert_eq!(count_challenges(&test_db.pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_upsert_challenge_rejects_empty_name() {
        let pool = setup_test_db().await;

        let result = upsert_challenge(&pool, &new_challenge(Uuid::new_v4(), "")).await;

        assert!(matches!(result, Err(SeedError::Validation(_))));
        assert_eq!(count_challenges(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_missing_challenge_is_not_found() {
        let pool = setup_test_db().await;

        let result = get_challenge(&pool, Uuid::new_v4()).await;

        assert!(matches!(result, Err(SeedError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_upsert_resource_role_stores_lowercase_name() {
        let pool = setup_test_db().await;
        let id = Uuid::new_v4();
        let role = NewResourceRole::new(id, "Copilot", "tester")
            .access(true, false)
            .self_obtainable(true)
            .legacy_id(14);

        let upserted = upsert_resource_role(&pool, &role)
            .await
            .expect("Failed to upsert resource role");

        assert_eq!(upserted.outcome, UpsertOutcome::Created);
        assert_eq!(upserted.row.name, "Copilot");
        assert_eq!(upserted.row.name_lower, "copilot");
        assert!(upserted.row.full_read_access);
        assert!(!upserted.row.full_write_access);
        assert!(upserted.row.is_active);
        assert!(upserted.row.self_obtainable);
        assert_eq!(upserted.row.legacy_id, Some(14));
    }

    #[tokio::test]
    async fn test_upsert_resource_role_twice_keeps_one_row() {
        let pool = setup_test_db().await;
        let id = Uuid::new_v4();
        let role = NewResourceRole::new(id, "Reviewer", "tester");

        upsert_resource_role(&pool, &role)
            .await
            .expect("Failed to upsert resource role");
        let second = upsert_resource_role(&pool, &role.clone().access(true, true))
            .await
            .expect("Failed to upsert resource role");

        assert_eq!(second.outcome, UpsertOutcome::Existing);
        assert!(!second.row.full_read_access);
        assert_eq!(count_resource_roles(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_resource_role_with_mismatched_name_lower_is_rejected() {
        let pool = setup_test_db().await;
        let mut role = NewResourceRole::new(Uuid::new_v4(), "Developer", "tester");
        role.name_lower = "dev".to_string();

        let result = upsert_resource_role(&pool, &role).await;

        match result {
            Err(SeedError::Validation(msg)) => assert!(msg.contains("nameLower")),
            other => panic!("Expected validation error, got {:?}", other.map(|r| r.row)),
        }
        assert_eq!(count_resource_roles(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_resource_references_parents() {
        let challenge_id = Uuid::new_v4();
        let role_id = Uuid::new_v4();
        let test_db = TestDbBuilder::new()
            .challenge(challenge_id, "Marathon")
            .resource_role(role_id, "Submitter")
            .build()
            .await
            .expect("Failed to build test database");

        let resource = create_resource(
            &test_db.pool,
            &new_resource(challenge_id, role_id, "member42"),
        )
        .await
        .expect("Failed to create resource");

        assert_eq!(resource.challenge_id, challenge_id);
        assert_eq!(resource.role_id, role_id);
        assert_eq!(resource.member_id, "member42");
        assert_eq!(resource.member_handle, "member42_handle");

        let stored = get_resource(&test_db.pool, resource.id)
            .await
            .expect("Failed to fetch resource");
        assert_eq!(stored.id, resource.id);
    }

    #[tokio::test]
    async fn test_create_resource_twice_creates_two_rows() {
        let challenge_id = Uuid::new_v4();
        let role_id = Uuid::new_v4();
        let test_db = TestDbBuilder::new()
            .challenge(challenge_id, "Marathon")
            .resource_role(role_id, "Submitter")
            .build()
            .await
            .expect("Failed to build test database");

        let payload = new_resource(challenge_id, role_id, "member1");
        let first = create_resource(&test_db.pool, &payload)
            .await
            .expect("Failed to create resource");
        let second = create_resource(&test_db.pool, &payload)
            .await
            .expect("Failed to create resource");

        assert_ne!(first.id, second.id);
        assert_eq!(count_resources(&test_db.pool).await.unwrap(), 2);

        let duplicates = find_duplicate_resources(&test_db.pool)
            .await
            .expect("Failed to find duplicates");
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].copies, 2);
        assert_eq!(duplicates[0].member_id, "member1");
        assert_eq!(duplicates[0].challenge_id, challenge_id.to_string());
    }

    #[tokio::test]
    async fn test_create_resource_without_challenge_fails() {
        let role_id = Uuid::new_v4();
        let test_db = TestDbBuilder::new()
            .resource_role(role_id, "Submitter")
            .build()
            .await
            .expect("Failed to build test database");

        let result = create_resource(
            &test_db.pool,
            &new_resource(Uuid::new_v4(), role_id, "member1"),
        )
        .await;

        assert!(matches!(result, Err(SeedError::Database(_))));
        assert_eq!(count_resources(&test_db.pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_resources_for_challenge_filters_by_challenge() {
        let marathon = Uuid::new_v4();
        let sprint = Uuid::new_v4();
        let role_id = Uuid::new_v4();
        let test_db = TestDbBuilder::new()
            .challenge(marathon, "Marathon")
            .challenge(sprint, "Sprint")
            .resource_role(role_id, "Submitter")
            .resource(marathon, role_id, "member1")
            .resource(marathon, role_id, "member2")
            .resource(sprint, role_id, "member3")
            .build()
            .await
            .expect("Failed to build test database");

        let resources = get_resources_for_challenge(&test_db.pool, marathon)
            .await
            .expect("Failed to get resources");

        assert_eq!(resources.len(), 2);
        assert!(resources.iter().all(|r| r.challenge_id == marathon));
        assert!(resources.iter().any(|r| r.member_id == "member1"));
        assert!(resources.iter().any(|r| r.member_id == "member2"));

        let duplicates = find_duplicate_resources(&test_db.pool)
            .await
            .expect("Failed to find duplicates");
        assert!(duplicates.is_empty());
    }
}
