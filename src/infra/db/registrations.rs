use async_trait::async_trait;
use chrono_tz::Tz;
use time::{Date, OffsetDateTime, Time};
use uuid::Uuid;

use crate::{
    application::repos::{RegistrationsRepo, RepoError, UpdateRegistrationParams},
    domain::{
        entities::{CeremonyRecord, PersonRecord, RegistrationRecord, SecondCeremonyRecord},
        types::EventType,
    },
};

use super::{PostgresRepositories, map_sqlx_error};

const REGISTRATION_COLUMNS: &str = "\
    id, client_id, slug, event_type, custom_event1_label, custom_event2_label, timezone, \
    cover_image_url, \
    bride_full_name, bride_nickname, bride_father_name, bride_mother_name, bride_instagram, \
    bride_photo_url, \
    groom_full_name, groom_nickname, groom_father_name, groom_mother_name, groom_instagram, \
    groom_photo_url, \
    event1_date, event1_start_time, event1_end_time, event1_venue_name, event1_address, \
    event1_city, event1_province, event1_maps_url, \
    event2_same_date, event2_same_time, event2_same_venue, event2_date, event2_start_time, \
    event2_end_time, event2_venue_name, event2_address, event2_city, event2_province, \
    event2_maps_url, \
    created_at, updated_at";

#[derive(sqlx::FromRow)]
struct RegistrationRow {
    id: Uuid,
    client_id: Uuid,
    slug: String,
    event_type: EventType,
    custom_event1_label: Option<String>,
    custom_event2_label: Option<String>,
    timezone: String,
    cover_image_url: Option<String>,
    bride_full_name: String,
    bride_nickname: String,
    bride_father_name: Option<String>,
    bride_mother_name: Option<String>,
    bride_instagram: Option<String>,
    bride_photo_url: Option<String>,
    groom_full_name: String,
    groom_nickname: String,
    groom_father_name: Option<String>,
    groom_mother_name: Option<String>,
    groom_instagram: Option<String>,
    groom_photo_url: Option<String>,
    event1_date: Date,
    event1_start_time: Time,
    event1_end_time: Option<Time>,
    event1_venue_name: String,
    event1_address: Option<String>,
    event1_city: Option<String>,
    event1_province: Option<String>,
    event1_maps_url: Option<String>,
    event2_same_date: bool,
    event2_same_time: bool,
    event2_same_venue: bool,
    event2_date: Option<Date>,
    event2_start_time: Option<Time>,
    event2_end_time: Option<Time>,
    event2_venue_name: Option<String>,
    event2_address: Option<String>,
    event2_city: Option<String>,
    event2_province: Option<String>,
    event2_maps_url: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TryFrom<RegistrationRow> for RegistrationRecord {
    type Error = RepoError;

    fn try_from(row: RegistrationRow) -> Result<Self, Self::Error> {
        let timezone = row
            .timezone
            .parse::<Tz>()
            .map_err(|err| RepoError::Integrity {
                message: format!(
                    "registration `{}` has invalid timezone `{}`: {err}",
                    row.slug, row.timezone
                ),
            })?;

        Ok(Self {
            id: row.id,
            client_id: row.client_id,
            slug: row.slug,
            event_type: row.event_type,
            custom_event1_label: row.custom_event1_label,
            custom_event2_label: row.custom_event2_label,
            timezone,
            cover_image_url: row.cover_image_url,
            bride: PersonRecord {
                full_name: row.bride_full_name,
                nickname: row.bride_nickname,
                father_name: row.bride_father_name,
                mother_name: row.bride_mother_name,
                instagram: row.bride_instagram,
                photo_url: row.bride_photo_url,
            },
            groom: PersonRecord {
                full_name: row.groom_full_name,
                nickname: row.groom_nickname,
                father_name: row.groom_father_name,
                mother_name: row.groom_mother_name,
                instagram: row.groom_instagram,
                photo_url: row.groom_photo_url,
            },
            event1: CeremonyRecord {
                date: row.event1_date,
                start_time: row.event1_start_time,
                end_time: row.event1_end_time,
                venue_name: row.event1_venue_name,
                address: row.event1_address,
                city: row.event1_city,
                province: row.event1_province,
                maps_url: row.event1_maps_url,
            },
            event2: SecondCeremonyRecord {
                same_date: row.event2_same_date,
                same_time: row.event2_same_time,
                same_venue: row.event2_same_venue,
                date: row.event2_date,
                start_time: row.event2_start_time,
                end_time: row.event2_end_time,
                venue_name: row.event2_venue_name,
                address: row.event2_address,
                city: row.event2_city,
                province: row.event2_province,
                maps_url: row.event2_maps_url,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl PostgresRepositories {
    async fn fetch_registration(
        &self,
        filter: &str,
        bind: RegistrationFilter<'_>,
    ) -> Result<Option<RegistrationRecord>, RepoError> {
        let sql = format!("SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE {filter}");
        let query = sqlx::query_as::<_, RegistrationRow>(&sql);
        let query = match bind {
            RegistrationFilter::Id(id) => query.bind(id),
            RegistrationFilter::Slug(slug) => query.bind(slug),
        };

        let row = query
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        row.map(RegistrationRecord::try_from).transpose()
    }
}

enum RegistrationFilter<'a> {
    Id(Uuid),
    Slug(&'a str),
}

#[async_trait]
impl RegistrationsRepo for PostgresRepositories {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RegistrationRecord>, RepoError> {
        self.fetch_registration("id = $1", RegistrationFilter::Id(id))
            .await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<RegistrationRecord>, RepoError> {
        self.fetch_registration("slug = $1", RegistrationFilter::Slug(slug))
            .await
    }

    async fn list_slugs(&self) -> Result<Vec<String>, RepoError> {
        sqlx::query_scalar::<_, String>("SELECT slug FROM registrations ORDER BY slug")
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)
    }

    async fn update_registration(
        &self,
        params: UpdateRegistrationParams,
    ) -> Result<RegistrationRecord, RepoError> {
        let sql = format!(
            r#"
            UPDATE registrations SET
                event_type = $2,
                custom_event1_label = $3,
                custom_event2_label = $4,
                timezone = $5,
                cover_image_url = $6,
                bride_full_name = $7,
                bride_nickname = $8,
                bride_father_name = $9,
                bride_mother_name = $10,
                bride_instagram = $11,
                bride_photo_url = $12,
                groom_full_name = $13,
                groom_nickname = $14,
                groom_father_name = $15,
                groom_mother_name = $16,
                groom_instagram = $17,
                groom_photo_url = $18,
                event1_date = $19,
                event1_start_time = $20,
                event1_end_time = $21,
                event1_venue_name = $22,
                event1_address = $23,
                event1_city = $24,
                event1_province = $25,
                event1_maps_url = $26,
                event2_same_date = $27,
                event2_same_time = $28,
                event2_same_venue = $29,
                event2_date = $30,
                event2_start_time = $31,
                event2_end_time = $32,
                event2_venue_name = $33,
                event2_address = $34,
                event2_city = $35,
                event2_province = $36,
                event2_maps_url = $37,
                updated_at = now()
            WHERE id = $1
            RETURNING {REGISTRATION_COLUMNS}
            "#
        );

        let UpdateRegistrationParams {
            id,
            event_type,
            custom_event1_label,
            custom_event2_label,
            timezone,
            cover_image_url,
            bride,
            groom,
            event1,
            event2,
        } = params;

        let row = sqlx::query_as::<_, RegistrationRow>(&sql)
            .bind(id)
            .bind(event_type)
            .bind(custom_event1_label)
            .bind(custom_event2_label)
            .bind(timezone.name())
            .bind(cover_image_url)
            .bind(bride.full_name)
            .bind(bride.nickname)
            .bind(bride.father_name)
            .bind(bride.mother_name)
            .bind(bride.instagram)
            .bind(bride.photo_url)
            .bind(groom.full_name)
            .bind(groom.nickname)
            .bind(groom.father_name)
            .bind(groom.mother_name)
            .bind(groom.instagram)
            .bind(groom.photo_url)
            .bind(event1.date)
            .bind(event1.start_time)
            .bind(event1.end_time)
            .bind(event1.venue_name)
            .bind(event1.address)
            .bind(event1.city)
            .bind(event1.province)
            .bind(event1.maps_url)
            .bind(event2.same_date)
            .bind(event2.same_time)
            .bind(event2.same_venue)
            .bind(event2.date)
            .bind(event2.start_time)
            .bind(event2.end_time)
            .bind(event2.venue_name)
            .bind(event2.address)
            .bind(event2.city)
            .bind(event2.province)
            .bind(event2.maps_url)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?
            .ok_or(RepoError::NotFound)?;

        RegistrationRecord::try_from(row)
    }
}
