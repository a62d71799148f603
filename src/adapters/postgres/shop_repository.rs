//! PostgreSQL implementation of ShopRepository.
//!
//! Text, category, status and owner filters run in SQL. Proximity searches
//! narrow candidates with a latitude/longitude bounding box in SQL and then
//! apply the exact great-circle filter and distance ordering in Rust.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::support::{corrupt, count, db_error, like_pattern, parse_column, ts};
use crate::domain::foundation::{
    DomainError, ErrorCode, GeoPoint, Page, PhoneNumber, ShopId, UserId,
};
use crate::domain::shop::{NearFilter, Shop, ShopHit, ShopSearch};
use crate::ports::ShopRepository;

const SHOP_COLUMNS: &str = "id, owner_id, name, description, category, address, latitude, \
     longitude, phone, status, created_at, updated_at";

/// Kilometres per degree of latitude.
const KM_PER_DEGREE: f64 = 111.32;

pub struct PostgresShopRepository {
    pool: PgPool,
}

impl PostgresShopRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn search_near(
        &self,
        search: &ShopSearch,
        near: &NearFilter,
    ) -> Result<Page<ShopHit>, DomainError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM shops", SHOP_COLUMNS));
        push_filter(&mut qb, search);

        let (min_lat, max_lat, min_lng, max_lng) = bounding_box(near);
        qb.push(" AND latitude BETWEEN ")
            .push_bind(min_lat)
            .push(" AND ")
            .push_bind(max_lat);
        if let (Some(min_lng), Some(max_lng)) = (min_lng, max_lng) {
            qb.push(" AND longitude BETWEEN ")
                .push_bind(min_lng)
                .push(" AND ")
                .push_bind(max_lng);
        }

        let rows: Vec<ShopRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to search shops", e))?;

        let mut hits = Vec::new();
        for row in rows {
            let shop = Shop::try_from(row)?;
            if let Some(hit) = search.matches(&shop) {
                hits.push(hit);
            }
        }
        search.sort_results(&mut hits);
        Ok(search.page.paginate(hits))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ShopRow {
    id: Uuid,
    owner_id: Uuid,
    name: String,
    description: Option<String>,
    category: String,
    address: String,
    latitude: f64,
    longitude: f64,
    phone: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ShopRow> for Shop {
    type Error = DomainError;

    fn try_from(row: ShopRow) -> Result<Self, Self::Error> {
        Ok(Shop::reconstitute(
            ShopId::from_uuid(row.id),
            UserId::from_uuid(row.owner_id),
            row.name,
            row.description,
            parse_column("category", &row.category)?,
            row.address,
            GeoPoint::new(row.latitude, row.longitude).map_err(|e| corrupt("location", e))?,
            row.phone
                .as_deref()
                .map(PhoneNumber::parse)
                .transpose()
                .map_err(|e| corrupt("phone", e))?,
            parse_column("status", &row.status)?,
            ts(row.created_at),
            ts(row.updated_at),
        ))
    }
}

fn push_filter<'a>(qb: &mut QueryBuilder<'a, Postgres>, search: &'a ShopSearch) {
    qb.push(" WHERE TRUE");
    if let Some(status) = search.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(category) = search.category {
        qb.push(" AND category = ").push_bind(category.as_str());
    }
    if let Some(owner) = &search.owner_id {
        qb.push(" AND owner_id = ").push_bind(*owner.as_uuid());
    }
    if let Some(q) = search.normalized_query() {
        let pattern = like_pattern(&q);
        qb.push(" AND (lower(name) LIKE ")
            .push_bind(pattern.clone())
            .push(" OR lower(address) LIKE ")
            .push_bind(pattern.clone())
            .push(" OR lower(coalesce(description, '')) LIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

/// Degree bounds enclosing the search circle. Longitude bounds are `None`
/// when the circle reaches a pole or crosses the antimeridian.
fn bounding_box(near: &NearFilter) -> (f64, f64, Option<f64>, Option<f64>) {
    let center = near.center();
    let lat_delta = near.radius_km() / KM_PER_DEGREE;
    let min_lat = (center.lat() - lat_delta).max(-90.0);
    let max_lat = (center.lat() + lat_delta).min(90.0);

    let widest_lat = center.lat().abs() + lat_delta;
    if widest_lat >= 90.0 {
        return (min_lat, max_lat, None, None);
    }
    let lng_delta = near.radius_km() / (KM_PER_DEGREE * widest_lat.to_radians().cos());
    let min_lng = center.lng() - lng_delta;
    let max_lng = center.lng() + lng_delta;
    if min_lng < -180.0 || max_lng > 180.0 {
        return (min_lat, max_lat, None, None);
    }
    (min_lat, max_lat, Some(min_lng), Some(max_lng))
}

#[async_trait]
impl ShopRepository for PostgresShopRepository {
    async fn save(&self, shop: &Shop) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO shops (
                id, owner_id, name, description, category, address, latitude, longitude,
                phone, status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(shop.id().as_uuid())
        .bind(shop.owner_id().as_uuid())
        .bind(shop.name())
        .bind(shop.description())
        .bind(shop.category().as_str())
        .bind(shop.address())
        .bind(shop.location().lat())
        .bind(shop.location().lng())
        .bind(shop.phone().map(PhoneNumber::as_str))
        .bind(shop.status().as_str())
        .bind(shop.created_at().as_datetime())
        .bind(shop.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to save shop", e))?;

        Ok(())
    }

    async fn update(&self, shop: &Shop) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE shops SET
                name = $2,
                description = $3,
                category = $4,
                address = $5,
                latitude = $6,
                longitude = $7,
                phone = $8,
                status = $9,
                updated_at = $10
            WHERE id = $1
            "#,
        )
        .bind(shop.id().as_uuid())
        .bind(shop.name())
        .bind(shop.description())
        .bind(shop.category().as_str())
        .bind(shop.address())
        .bind(shop.location().lat())
        .bind(shop.location().lng())
        .bind(shop.phone().map(PhoneNumber::as_str))
        .bind(shop.status().as_str())
        .bind(shop.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update shop", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(ErrorCode::ShopNotFound, "Shop", shop.id()));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &ShopId) -> Result<Option<Shop>, DomainError> {
        let sql = format!("SELECT {} FROM shops WHERE id = $1", SHOP_COLUMNS);
        let row: Option<ShopRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find shop", e))?;

        row.map(Shop::try_from).transpose()
    }

    async fn search(&self, search: &ShopSearch) -> Result<Page<ShopHit>, DomainError> {
        if let Some(near) = &search.near {
            return self.search_near(search, near).await;
        }

        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM shops");
        push_filter(&mut count_qb, search);
        let (total,): (i64,) = count_qb
            .build_query_as()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count shops", e))?;

        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM shops", SHOP_COLUMNS));
        push_filter(&mut qb, search);
        qb.push(" ORDER BY lower(name) COLLATE \"C\", id LIMIT ")
            .push_bind(search.page.limit() as i64)
            .push(" OFFSET ")
            .push_bind(search.page.offset() as i64);

        let rows: Vec<ShopRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to search shops", e))?;

        let hits = rows
            .into_iter()
            .map(|row| {
                Shop::try_from(row).map(|shop| ShopHit {
                    shop,
                    distance_km: None,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(hits, count(total), search.page))
    }
}
