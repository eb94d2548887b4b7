//! Typed GraphQL response shapes for the GitHub API.

use crate::aggregate::Alert;
use crate::deploy_keys::DeployKey;
use crate::error::{AuditError, Result};
use crate::severity::Severity;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

impl<T> GraphQlResponse<T> {
    /// Unwraps the payload, surfacing any GraphQL-level errors.
    pub fn into_data(self) -> Result<T> {
        if !self.errors.is_empty() {
            let messages: Vec<String> = self.errors.into_iter().map(|e| e.message).collect();
            return Err(AuditError::Api(messages.join("; ")));
        }
        self.data
            .ok_or_else(|| AuditError::Api("response contained no data".to_string()))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrgReposData {
    pub organization: Option<Organization>,
}

#[derive(Debug, Deserialize)]
pub struct Organization {
    pub repositories: Option<RepoConnection>,
    pub team: Option<Team>,
    pub repository: Option<Repository>,
}

#[derive(Debug, Deserialize)]
pub struct Team {
    pub repositories: TeamRepoConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub vulnerability_alerts: AlertConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoConnection {
    pub nodes: Vec<RepoNode>,
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRepoConnection {
    pub edges: Vec<TeamRepoEdge>,
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
pub struct TeamRepoEdge {
    pub node: RepoNode,
    pub permission: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoNode {
    pub name: String,
    pub is_archived: bool,
    pub vulnerability_alerts: AlertConnection,
    pub repository_topics: TopicConnection,
}

impl RepoNode {
    pub fn topic_names(&self) -> Vec<String> {
        self.repository_topics
            .edges
            .iter()
            .map(|edge| edge.node.topic.name.clone())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertConnection {
    pub nodes: Vec<AlertNode>,
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertNode {
    pub created_at: DateTime<Utc>,
    pub fixed_at: Option<DateTime<Utc>>,
    pub dismissed_at: Option<DateTime<Utc>>,
    pub security_vulnerability: SecurityVulnerability,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityVulnerability {
    pub severity: String,
    pub advisory: Advisory,
    pub package: Package,
    pub first_patched_version: Option<PatchedVersion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advisory {
    pub withdrawn_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct Package {
    pub name: String,
    pub ecosystem: String,
}

#[derive(Debug, Deserialize)]
pub struct PatchedVersion {
    pub identifier: String,
}

#[derive(Debug, Deserialize)]
pub struct TopicConnection {
    pub edges: Vec<TopicEdge>,
}

#[derive(Debug, Deserialize)]
pub struct TopicEdge {
    pub node: TopicNode,
}

#[derive(Debug, Deserialize)]
pub struct TopicNode {
    pub topic: Topic,
}

#[derive(Debug, Deserialize)]
pub struct Topic {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct KeyReposData {
    pub organization: Option<KeyOrganization>,
}

#[derive(Debug, Deserialize)]
pub struct KeyOrganization {
    pub repositories: Option<KeyRepoConnection>,
    pub team: Option<KeyTeam>,
}

#[derive(Debug, Deserialize)]
pub struct KeyTeam {
    pub repositories: KeyTeamRepoConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyRepoConnection {
    pub nodes: Vec<KeyRepoNode>,
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyTeamRepoConnection {
    pub edges: Vec<KeyTeamRepoEdge>,
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
pub struct KeyTeamRepoEdge {
    pub node: KeyRepoNode,
    pub permission: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyRepoNode {
    pub name: String,
    pub deploy_keys: DeployKeyConnection,
}

impl KeyRepoNode {
    pub fn into_keys(self) -> Vec<DeployKey> {
        let repository = self.name;
        self.deploy_keys
            .nodes
            .into_iter()
            .map(|node| DeployKey {
                repository: repository.clone(),
                created_at: node.created_at,
                read_only: node.read_only,
                title: node.title,
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct DeployKeyConnection {
    pub nodes: Vec<DeployKeyNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployKeyNode {
    pub created_at: DateTime<Utc>,
    pub read_only: bool,
    pub title: String,
}

impl AlertNode {
    /// Flattens one wire alert into the core's input record. Fails on a
    /// severity outside the SLA ladder; a missing patched version is normal
    /// and becomes the sentinel downstream.
    pub fn into_alert(self, repository: &str, topics: &[String]) -> Result<Alert> {
        let vuln = self.security_vulnerability;
        let severity: Severity = vuln.severity.parse()?;
        Ok(Alert {
            repository: repository.to_string(),
            package_name: vuln.package.name,
            ecosystem: vuln.package.ecosystem,
            severity,
            first_patched_version: vuln.first_patched_version.map(|v| v.identifier),
            published_at: self.created_at.date_naive(),
            dismissed_at: self.dismissed_at,
            fixed_at: self.fixed_at,
            withdrawn_at: vuln.advisory.withdrawn_at,
            repo_topics: topics.to_vec(),
        })
    }
}
