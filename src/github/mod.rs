//! GitHub GraphQL fetch layer.
//!
//! Cursor-based pagination with explicit accumulation into typed lists. The
//! nested vulnerability alerts are fetched inline; repositories whose first
//! alert page overflows get a dedicated per-repository pagination pass.

mod wire;

pub use wire::{AlertNode, GraphQlResponse, KeyRepoNode, KeyReposData, OrgReposData, RepoNode};

use crate::aggregate::Alert;
use crate::config::Config;
use crate::deploy_keys::DeployKey;
use crate::error::{AuditError, Result};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, info};

const ORG_REPOS_QUERY: &str = r#"
    query($org_name: String!, $after: String) {
        organization(login: $org_name) {
            repositories(first: 100, after: $after) {
                nodes {
                    name
                    isArchived
                    vulnerabilityAlerts(first: 100) {
                        nodes {
                            createdAt
                            fixedAt
                            dismissedAt
                            securityVulnerability {
                                severity
                                advisory { withdrawnAt }
                                package { name ecosystem }
                                firstPatchedVersion { identifier }
                            }
                        }
                        pageInfo { hasNextPage }
                    }
                    repositoryTopics(first: 100) {
                        edges { node { topic { name } } }
                    }
                }
                pageInfo { hasNextPage endCursor }
            }
        }
    }
"#;

const TEAM_REPOS_QUERY: &str = r#"
    query($org_name: String!, $team_slug: String!, $after: String) {
        organization(login: $org_name) {
            team(slug: $team_slug) {
                repositories(first: 100, after: $after) {
                    edges {
                        node {
                            name
                            isArchived
                            vulnerabilityAlerts(first: 100) {
                                nodes {
                                    createdAt
                                    fixedAt
                                    dismissedAt
                                    securityVulnerability {
                                        severity
                                        advisory { withdrawnAt }
                                        package { name ecosystem }
                                        firstPatchedVersion { identifier }
                                    }
                                }
                                pageInfo { hasNextPage }
                            }
                            repositoryTopics(first: 100) {
                                edges { node { topic { name } } }
                            }
                        }
                        permission
                    }
                    pageInfo { hasNextPage endCursor }
                }
            }
        }
    }
"#;

const REPO_ALERTS_QUERY: &str = r#"
    query($org_name: String!, $repo_name: String!, $after: String) {
        organization(login: $org_name) {
            repository(name: $repo_name) {
                vulnerabilityAlerts(first: 100, after: $after) {
                    nodes {
                        createdAt
                        fixedAt
                        dismissedAt
                        securityVulnerability {
                            severity
                            advisory { withdrawnAt }
                            package { name ecosystem }
                            firstPatchedVersion { identifier }
                        }
                    }
                    pageInfo { hasNextPage endCursor }
                }
            }
        }
    }
"#;

const ORG_DEPLOY_KEYS_QUERY: &str = r#"
    query($org_name: String!, $after: String) {
        organization(login: $org_name) {
            repositories(first: 100, after: $after) {
                nodes {
                    name
                    deployKeys(first: 100) {
                        nodes { createdAt readOnly title }
                    }
                }
                pageInfo { hasNextPage endCursor }
            }
        }
    }
"#;

const TEAM_DEPLOY_KEYS_QUERY: &str = r#"
    query($org_name: String!, $team_slug: String!, $after: String) {
        organization(login: $org_name) {
            team(slug: $team_slug) {
                repositories(first: 100, after: $after) {
                    edges {
                        node {
                            name
                            deployKeys(first: 100) {
                                nodes { createdAt readOnly title }
                            }
                        }
                        permission
                    }
                    pageInfo { hasNextPage endCursor }
                }
            }
        }
    }
"#;

pub struct GithubClient {
    http: reqwest::blocking::Client,
    graphql_url: String,
    token: String,
}

impl GithubClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("sla-audit/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            graphql_url: config.graphql_url.clone(),
            token: config.github_token.clone(),
        })
    }

    fn post<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        let response = self
            .http
            .post(&self.graphql_url)
            .bearer_auth(&self.token)
            .json(&json!({"query": query, "variables": variables}))
            .send()?;
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(AuditError::Api(format!("HTTP {status}: {body}")));
        }
        let decoded: GraphQlResponse<T> = serde_json::from_str(&body)?;
        decoded.into_data()
    }

    fn fetch_org_repos(&self, org: &str) -> Result<Vec<RepoNode>> {
        let mut repos = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let data: OrgReposData = self.post(
                ORG_REPOS_QUERY,
                json!({"org_name": org, "after": cursor}),
            )?;
            let connection = data
                .organization
                .and_then(|o| o.repositories)
                .ok_or_else(|| AuditError::Api(format!("organization {org} not found")))?;
            repos.extend(connection.nodes);
            if !connection.page_info.has_next_page {
                break;
            }
            cursor = connection.page_info.end_cursor;
        }
        Ok(repos)
    }

    /// Team repositories, restricted to those the team administers.
    fn fetch_team_repos(&self, org: &str, team_slug: &str) -> Result<Vec<RepoNode>> {
        let mut repos = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let data: OrgReposData = self.post(
                TEAM_REPOS_QUERY,
                json!({"org_name": org, "team_slug": team_slug, "after": cursor}),
            )?;
            let connection = data
                .organization
                .and_then(|o| o.team)
                .map(|t| t.repositories)
                .ok_or_else(|| AuditError::Api(format!("team {team_slug} not found in {org}")))?;
            repos.extend(
                connection
                    .edges
                    .into_iter()
                    .filter(|edge| edge.permission == "ADMIN")
                    .map(|edge| edge.node),
            );
            if !connection.page_info.has_next_page {
                break;
            }
            cursor = connection.page_info.end_cursor;
        }
        Ok(repos)
    }

    /// Full alert list for one repository, for repositories whose inline
    /// first page reported more pages.
    fn fetch_repo_alerts(&self, org: &str, repo_name: &str) -> Result<Vec<AlertNode>> {
        let mut alerts = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let data: OrgReposData = self.post(
                REPO_ALERTS_QUERY,
                json!({"org_name": org, "repo_name": repo_name, "after": cursor}),
            )?;
            let connection = data
                .organization
                .and_then(|o| o.repository)
                .map(|r| r.vulnerability_alerts)
                .ok_or_else(|| AuditError::Api(format!("repository {repo_name} not found")))?;
            alerts.extend(connection.nodes);
            if !connection.page_info.has_next_page {
                break;
            }
            cursor = connection.page_info.end_cursor;
        }
        Ok(alerts)
    }

    fn fetch_org_key_repos(&self, org: &str) -> Result<Vec<KeyRepoNode>> {
        let mut repos = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let data: KeyReposData = self.post(
                ORG_DEPLOY_KEYS_QUERY,
                json!({"org_name": org, "after": cursor}),
            )?;
            let connection = data
                .organization
                .and_then(|o| o.repositories)
                .ok_or_else(|| AuditError::Api(format!("organization {org} not found")))?;
            repos.extend(connection.nodes);
            if !connection.page_info.has_next_page {
                break;
            }
            cursor = connection.page_info.end_cursor;
        }
        Ok(repos)
    }

    fn fetch_team_key_repos(&self, org: &str, team_slug: &str) -> Result<Vec<KeyRepoNode>> {
        let mut repos = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let data: KeyReposData = self.post(
                TEAM_DEPLOY_KEYS_QUERY,
                json!({"org_name": org, "team_slug": team_slug, "after": cursor}),
            )?;
            let connection = data
                .organization
                .and_then(|o| o.team)
                .map(|t| t.repositories)
                .ok_or_else(|| AuditError::Api(format!("team {team_slug} not found in {org}")))?;
            repos.extend(
                connection
                    .edges
                    .into_iter()
                    .filter(|edge| edge.permission == "ADMIN")
                    .map(|edge| edge.node),
            );
            if !connection.page_info.has_next_page {
                break;
            }
            cursor = connection.page_info.end_cursor;
        }
        Ok(repos)
    }

    /// Fetches every deploy key across the configured repository set, in
    /// repository order. Repositories without keys contribute nothing.
    pub fn fetch_deploy_keys(&self, config: &Config) -> Result<Vec<DeployKey>> {
        let repos = match &config.team_slug {
            Some(team_slug) => self.fetch_team_key_repos(&config.org, team_slug)?,
            None => self.fetch_org_key_repos(&config.org)?,
        };
        info!(repos = repos.len(), org = %config.org, "fetched repositories");

        let keys: Vec<DeployKey> = repos.into_iter().flat_map(KeyRepoNode::into_keys).collect();
        info!(keys = keys.len(), "fetched deploy keys");
        Ok(keys)
    }

    /// Fetches every open alert across the configured repository set.
    pub fn fetch_alerts(&self, config: &Config) -> Result<Vec<Alert>> {
        let repos = match &config.team_slug {
            Some(team_slug) => self.fetch_team_repos(&config.org, team_slug)?,
            None => self.fetch_org_repos(&config.org)?,
        };
        info!(repos = repos.len(), org = %config.org, "fetched repositories");

        let mut alerts = Vec::new();
        for repo in repos {
            let topics = repo.topic_names();
            if !keep_repo(&repo, config.topic.as_deref(), &topics) {
                continue;
            }
            let nodes = if repo.vulnerability_alerts.page_info.has_next_page {
                debug!(repo = %repo.name, "alerts overflow one page, refetching");
                self.fetch_repo_alerts(&config.org, &repo.name)?
            } else {
                repo.vulnerability_alerts.nodes
            };
            for node in nodes {
                alerts.push(node.into_alert(&repo.name, &topics)?);
            }
        }
        info!(alerts = alerts.len(), "fetched vulnerability alerts");
        Ok(alerts)
    }
}

/// Archived repositories are skipped, and when a topic filter is configured
/// only repositories carrying that topic are audited.
fn keep_repo(repo: &RepoNode, topic: Option<&str>, topics: &[String]) -> bool {
    if repo.is_archived {
        return false;
    }
    match topic {
        Some(wanted) => topics.iter().any(|t| t == wanted),
        None => true,
    }
}
