//! Users, profiles and kids.

use std::collections::HashMap;

use sqlx::Row;
use uuid::Uuid;

use crate::core::access::{ensure, owns_kid};
use crate::core::Role;
use crate::models::{
    BabysitterListing, BabysitterPatch, BabysitterProfile, FamilyListing, Kid, KidPatch, NewKid,
    ParentPatch, ParentProfile, RegisterRequest, User, UserType,
};
use crate::services::postgres::{classify, PostgresClient, PostgresError};

impl PostgresClient {
    /// Create a user together with its babysitter or family profile
    pub async fn register(&self, request: &RegisterRequest) -> Result<(User, Role), PostgresError> {
        let mut tx = self.pool.begin().await?;

        let user: User = sqlx::query_as(
            r#"
            INSERT INTO users (id, username, email)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, is_active, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.username)
        .bind(&request.email)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| classify(e, "User"))?;

        let role = match request.user_type {
            UserType::Babysitter => {
                let profile = request.babysitter.as_ref().ok_or_else(|| {
                    PostgresError::InvalidInput("babysitter profile is required".to_string())
                })?;
                let id = Uuid::new_v4();
                sqlx::query(
                    r#"
                    INSERT INTO babysitters
                        (id, user_id, name, age, address, hourly_rate_cents, description, phone_number)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                    "#,
                )
                .bind(id)
                .bind(user.id)
                .bind(&profile.name)
                .bind(profile.age)
                .bind(&profile.address)
                .bind(profile.hourly_rate_cents)
                .bind(&profile.description)
                .bind(&profile.phone_number)
                .execute(&mut *tx)
                .await
                .map_err(|e| classify(e, "Babysitter"))?;
                Role::Babysitter(id)
            }
            UserType::Parent => {
                let profile = request.parent.as_ref().ok_or_else(|| {
                    PostgresError::InvalidInput("parent profile is required".to_string())
                })?;
                let id = Uuid::new_v4();
                sqlx::query(
                    r#"
                    INSERT INTO parents
                        (id, user_id, dad_name, mom_name, last_name, address, phone_number)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    "#,
                )
                .bind(id)
                .bind(user.id)
                .bind(&profile.dad_name)
                .bind(&profile.mom_name)
                .bind(&profile.last_name)
                .bind(&profile.address)
                .bind(&profile.phone_number)
                .execute(&mut *tx)
                .await
                .map_err(|e| classify(e, "Family"))?;
                Role::Parent(id)
            }
        };

        tx.commit().await?;

        tracing::info!("Registered user {} as {:?}", user.id, role);
        Ok((user, role))
    }

    /// Resolve the role of an active user; `None` for unknown, inactive or
    /// profile-less users
    pub async fn resolve_role(&self, user_id: Uuid) -> Result<Option<Role>, PostgresError> {
        let row = sqlx::query(
            r#"
            SELECT u.is_active, b.id AS babysitter_id, p.id AS family_id
            FROM users u
            LEFT JOIN babysitters b ON b.user_id = u.id
            LEFT JOIN parents p ON p.user_id = u.id
            WHERE u.id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        if !row.get::<bool, _>("is_active") {
            tracing::debug!("User {} is inactive", user_id);
            return Ok(None);
        }

        let babysitter_id: Option<Uuid> = row.get("babysitter_id");
        let family_id: Option<Uuid> = row.get("family_id");

        Ok(babysitter_id
            .map(Role::Babysitter)
            .or(family_id.map(Role::Parent)))
    }

    /// Mark a user inactive; their babysitter profile disappears from listings
    pub async fn deactivate_user(&self, user_id: Uuid) -> Result<(), PostgresError> {
        let result = sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PostgresError::not_found("User"));
        }

        tracing::info!("Deactivated user {}", user_id);
        Ok(())
    }

    pub async fn list_babysitters(&self) -> Result<Vec<BabysitterListing>, PostgresError> {
        let listings = sqlx::query_as(
            r#"
            SELECT b.id, b.name, b.age, b.address, b.hourly_rate_cents, b.description
            FROM babysitters b
            JOIN users u ON u.id = b.user_id
            WHERE u.is_active
            ORDER BY b.created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(listings)
    }

    pub async fn list_families(&self) -> Result<Vec<FamilyListing>, PostgresError> {
        let mut families: Vec<FamilyListing> = sqlx::query_as(
            r#"
            SELECT id, dad_name, mom_name, last_name, address
            FROM parents
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let kids: Vec<Kid> = sqlx::query_as(
            "SELECT id, family_id, name, age, created_at FROM kids ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_family: HashMap<Uuid, Vec<Kid>> = HashMap::new();
        for kid in kids {
            by_family.entry(kid.family_id).or_default().push(kid);
        }
        for family in &mut families {
            family.kids = by_family.remove(&family.id).unwrap_or_default();
        }

        tracing::debug!("Listing {} families", families.len());
        Ok(families)
    }

    pub async fn get_babysitter(&self, babysitter_id: Uuid) -> Result<BabysitterProfile, PostgresError> {
        sqlx::query_as(
            r#"
            SELECT id, user_id, name, age, address, hourly_rate_cents, description,
                   phone_number, created_at
            FROM babysitters
            WHERE id = $1
            "#,
        )
        .bind(babysitter_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| PostgresError::not_found("Babysitter"))
    }

    pub async fn babysitter_exists(&self, babysitter_id: Uuid) -> Result<bool, PostgresError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM babysitters WHERE id = $1)")
            .bind(babysitter_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    pub async fn get_family(&self, family_id: Uuid) -> Result<ParentProfile, PostgresError> {
        let mut family: ParentProfile = sqlx::query_as(
            r#"
            SELECT id, user_id, dad_name, mom_name, last_name, address, phone_number, created_at
            FROM parents
            WHERE id = $1
            "#,
        )
        .bind(family_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| PostgresError::not_found("Family"))?;

        family.kids = sqlx::query_as(
            r#"
            SELECT id, family_id, name, age, created_at
            FROM kids
            WHERE family_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(family_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(family)
    }

    pub async fn update_babysitter(
        &self,
        babysitter_id: Uuid,
        patch: &BabysitterPatch,
    ) -> Result<BabysitterProfile, PostgresError> {
        sqlx::query_as(
            r#"
            UPDATE babysitters SET
                name = COALESCE($2, name),
                age = COALESCE($3, age),
                address = COALESCE($4, address),
                hourly_rate_cents = COALESCE($5, hourly_rate_cents),
                description = COALESCE($6, description),
                phone_number = COALESCE($7, phone_number)
            WHERE id = $1
            RETURNING id, user_id, name, age, address, hourly_rate_cents, description,
                      phone_number, created_at
            "#,
        )
        .bind(babysitter_id)
        .bind(&patch.name)
        .bind(patch.age)
        .bind(&patch.address)
        .bind(patch.hourly_rate_cents)
        .bind(&patch.description)
        .bind(&patch.phone_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| classify(e, "Phone number"))?
        .ok_or_else(|| PostgresError::not_found("Babysitter"))
    }

    pub async fn update_family(
        &self,
        family_id: Uuid,
        patch: &ParentPatch,
    ) -> Result<ParentProfile, PostgresError> {
        let updated = sqlx::query(
            r#"
            UPDATE parents SET
                dad_name = COALESCE($2, dad_name),
                mom_name = COALESCE($3, mom_name),
                last_name = COALESCE($4, last_name),
                address = COALESCE($5, address),
                phone_number = COALESCE($6, phone_number)
            WHERE id = $1
            "#,
        )
        .bind(family_id)
        .bind(&patch.dad_name)
        .bind(&patch.mom_name)
        .bind(&patch.last_name)
        .bind(&patch.address)
        .bind(&patch.phone_number)
        .execute(&self.pool)
        .await
        .map_err(|e| classify(e, "Phone number"))?;

        if updated.rows_affected() == 0 {
            return Err(PostgresError::not_found("Family"));
        }

        self.get_family(family_id).await
    }

    pub async fn add_kid(&self, family_id: Uuid, kid: &NewKid) -> Result<Kid, PostgresError> {
        let kid: Kid = sqlx::query_as(
            r#"
            INSERT INTO kids (id, family_id, name, age)
            VALUES ($1, $2, $3, $4)
            RETURNING id, family_id, name, age, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(family_id)
        .bind(&kid.name)
        .bind(kid.age)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Added kid {} to family {}", kid.id, family_id);
        Ok(kid)
    }

    pub async fn update_kid(&self, role: &Role, kid_id: Uuid, patch: &KidPatch) -> Result<Kid, PostgresError> {
        let kid: Kid = sqlx::query_as("SELECT id, family_id, name, age, created_at FROM kids WHERE id = $1")
            .bind(kid_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::not_found("Kid"))?;

        ensure(owns_kid(role, &kid), "kid")?;

        let kid = sqlx::query_as(
            r#"
            UPDATE kids SET
                name = COALESCE($2, name),
                age = COALESCE($3, age)
            WHERE id = $1
            RETURNING id, family_id, name, age, created_at
            "#,
        )
        .bind(kid_id)
        .bind(&patch.name)
        .bind(patch.age)
        .fetch_one(&self.pool)
        .await?;

        Ok(kid)
    }
}
