// ==========================================
// 批量抄表工作台 - 网关层 HTTP 实现
// ==========================================
// 工具: reqwest (JSON)
// 约定: 非 2xx 响应尽力解析后端 {message} 作为错误详情;
//       上期读数查询的 404 视为"确认无记录"，不是错误
// ==========================================

use crate::config::Settings;
use crate::domain::{
    Building, BulkCreateReceipt, Lease, ReadingPeriod, ReadingRecord, Unit, UtilityType,
};
use crate::domain::types::LeaseStatus;
use crate::gateway::error::{GatewayError, GatewayResult};
use crate::gateway::LeasingGateway;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ==========================================
// 线上数据传输对象 (wire DTO)
// ==========================================
// 后端使用 camelCase；领域实体字段为 snake_case，
// 在此完成双向映射，避免序列化约定泄漏进领域层

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildingDto {
    building_id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnitDto {
    unit_id: String,
    unit_no: String,
    unit_type: Option<String>,
    #[serde(default = "default_has_meter")]
    has_meter: bool,
}

fn default_has_meter() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeaseDto {
    lease_id: String,
    unit_id: String,
    tenant_name: Option<String>,
    status: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UtilityTypeDto {
    utility_type_id: String,
    name: String,
    unit_label: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReadingValueDto {
    value: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReadingExistsDto {
    exists: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BulkCreateRequest<'a> {
    batch_id: &'a str,
    readings: &'a [ReadingRecord],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BulkCreateResponseDto {
    created: usize,
    message: Option<String>,
}

/// 后端错误响应体（尽力解析）
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

// ==========================================
// HttpLeasingGateway
// ==========================================

pub struct HttpLeasingGateway {
    client: Client,
    base_url: String,
}

impl HttpLeasingGateway {
    /// 由配置构造网关
    ///
    /// # 参数
    /// - settings: 系统配置（接口地址、超时）
    pub fn new(settings: &Settings) -> GatewayResult<Self> {
        let base_url = settings.api_base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(GatewayError::InvalidBaseUrl("接口地址为空".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(settings.request_timeout_ms))
            .build()
            .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 统一处理非 2xx 响应: 尽力解析后端错误详情
    async fn decode_error(response: Response) -> GatewayError {
        let status = response.status().as_u16();
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message);
        GatewayError::BackendStatus { status, detail }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> GatewayResult<T> {
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        Ok(response.json::<T>().await?)
    }

    async fn post_bulk(
        &self,
        path: &str,
        batch_id: &str,
        records: &[ReadingRecord],
    ) -> GatewayResult<BulkCreateReceipt> {
        let request = BulkCreateRequest {
            batch_id,
            readings: records,
        };

        let response = self
            .client
            .post(self.url(path))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        let dto = response.json::<BulkCreateResponseDto>().await?;
        Ok(BulkCreateReceipt {
            created: dto.created,
            message: dto.message,
        })
    }
}

#[async_trait]
impl LeasingGateway for HttpLeasingGateway {
    async fn fetch_buildings(&self) -> GatewayResult<Vec<Building>> {
        let dtos: Vec<BuildingDto> = self.get_json("/api/buildings", &[]).await?;
        Ok(dtos
            .into_iter()
            .map(|d| Building {
                building_id: d.building_id,
                name: d.name,
            })
            .collect())
    }

    async fn fetch_occupied_units(&self, building_id: &str) -> GatewayResult<Vec<Unit>> {
        let path = format!("/api/buildings/{}/units", building_id);
        let dtos: Vec<UnitDto> = self
            .get_json(&path, &[("occupied", "true".to_string())])
            .await?;
        Ok(dtos
            .into_iter()
            .map(|d| Unit {
                unit_id: d.unit_id,
                unit_no: d.unit_no,
                unit_type: d.unit_type,
                has_meter: d.has_meter,
            })
            .collect())
    }

    async fn fetch_leases(&self, building_id: &str) -> GatewayResult<Vec<Lease>> {
        let path = format!("/api/buildings/{}/leases", building_id);
        let dtos: Vec<LeaseDto> = self.get_json(&path, &[]).await?;
        Ok(dtos
            .into_iter()
            .map(|d| Lease {
                lease_id: d.lease_id,
                unit_id: d.unit_id,
                tenant_name: d.tenant_name,
                status: LeaseStatus::from_str(&d.status),
                start_date: d.start_date,
                end_date: d.end_date,
            })
            .collect())
    }

    async fn fetch_utility_types(&self) -> GatewayResult<Vec<UtilityType>> {
        let dtos: Vec<UtilityTypeDto> = self.get_json("/api/utility-types", &[]).await?;
        Ok(dtos
            .into_iter()
            .map(|d| UtilityType {
                utility_type_id: d.utility_type_id,
                name: d.name,
                unit_label: d.unit_label,
            })
            .collect())
    }

    async fn fetch_reading_value(
        &self,
        unit_id: &str,
        utility_type_id: &str,
        period: ReadingPeriod,
    ) -> GatewayResult<Option<f64>> {
        let path = format!("/api/units/{}/readings/value", unit_id);
        let response = self
            .client
            .get(self.url(&path))
            .query(&[
                ("utilityTypeId", utility_type_id.to_string()),
                ("year", period.year.to_string()),
                ("month", period.month.to_string()),
            ])
            .send()
            .await?;

        // 404 = 确认无记录，区别于查询失败
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        let dto = response.json::<ReadingValueDto>().await?;
        Ok(Some(dto.value))
    }

    async fn has_reading(
        &self,
        unit_id: &str,
        utility_type_id: &str,
        period: ReadingPeriod,
    ) -> GatewayResult<bool> {
        let path = format!("/api/units/{}/readings/exists", unit_id);
        let dto: ReadingExistsDto = self
            .get_json(
                &path,
                &[
                    ("utilityTypeId", utility_type_id.to_string()),
                    ("year", period.year.to_string()),
                    ("month", period.month.to_string()),
                ],
            )
            .await?;
        Ok(dto.exists)
    }

    async fn bulk_create_validated(
        &self,
        batch_id: &str,
        records: &[ReadingRecord],
    ) -> GatewayResult<BulkCreateReceipt> {
        self.post_bulk("/api/readings/bulk-validated", batch_id, records)
            .await
    }

    async fn bulk_create(
        &self,
        batch_id: &str,
        records: &[ReadingRecord],
    ) -> GatewayResult<BulkCreateReceipt> {
        self.post_bulk("/api/readings/bulk", batch_id, records).await
    }
}
