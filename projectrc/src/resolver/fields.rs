//! Three-tier field resolution.
//!
//! Every field is resolved in the same order: the package override, then
//! the top-level config, then repository metadata where a fallback exists.
//! Each field has its own function so the order stays explicit.

use crate::config::{Extras, Meta, NpmSetting, Override, ProjectRc, Setting};
use crate::github::RepositoryMetadata;

/// Description: override, config, repository description.
pub fn resolve_description(
    overrides: Option<&Override>,
    config: &ProjectRc,
    repository: &RepositoryMetadata,
) -> Option<String> {
    overrides
        .and_then(|o| o.description.clone())
        .or_else(|| config.description.clone())
        .or_else(|| repository.description().map(str::to_string))
}

/// Website: the first explicit setting decides.
///
/// A URL is used as is, `true` selects the repository homepage and `false`
/// hides the website. Without any setting the homepage is used.
pub fn resolve_website(
    overrides: Option<&Override>,
    config: &ProjectRc,
    repository: &RepositoryMetadata,
) -> Option<String> {
    let setting = overrides
        .and_then(|o| o.website.as_ref())
        .or(config.website.as_ref());

    match setting {
        Some(Setting::Value(url)) => Some(url.clone()),
        Some(Setting::Enabled(false)) => None,
        Some(Setting::Enabled(true)) | None => repository.homepage().map(str::to_string),
    }
}

/// README intent: override, config.
pub fn resolve_readme_setting<'a>(
    overrides: Option<&'a Override>,
    config: &'a ProjectRc,
) -> Option<&'a Setting> {
    overrides
        .and_then(|o| o.readme.as_ref())
        .or(config.readme.as_ref())
}

/// Meta: override, config.
pub fn resolve_meta(overrides: Option<&Override>, config: &ProjectRc) -> Option<Meta> {
    overrides
        .and_then(|o| o.meta.clone())
        .or_else(|| config.meta.clone())
}

/// Extras, merged per field: override, config.
pub fn resolve_extras(overrides: Option<&Override>, config: &ProjectRc) -> Option<Extras> {
    let local = overrides.and_then(|o| o.extras.as_ref());
    let global = config.extras.as_ref();
    if local.is_none() && global.is_none() {
        return None;
    }

    Some(Extras {
        stars: pick(local, global, |e| e.stars),
        version: pick(local, global, |e| e.version),
        deprecated: pick(local, global, |e| e.deprecated.clone()),
        npm: pick(local, global, |e| e.npm.clone()),
    })
}

fn pick<T>(
    local: Option<&Extras>,
    global: Option<&Extras>,
    field: impl Fn(&Extras) -> Option<T>,
) -> Option<T> {
    local.and_then(&field).or_else(|| global.and_then(&field))
}

/// npm intent of merged extras.
pub fn resolve_npm_setting(extras: Option<&Extras>) -> Option<&NpmSetting> {
    extras.and_then(|e| e.npm.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NpmOptions;

    fn repository() -> RepositoryMetadata {
        RepositoryMetadata {
            name: "projectrc".to_string(),
            description: Some("from repository".to_string()),
            homepage_url: Some("https://projectrc.dev".to_string()),
            ..Default::default()
        }
    }

    fn named(name: &str) -> Override {
        Override {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn description_falls_through_three_tiers() {
        let repo = repository();
        let mut config = ProjectRc::default();
        assert_eq!(
            resolve_description(None, &config, &repo).as_deref(),
            Some("from repository")
        );

        config.description = Some("from config".to_string());
        assert_eq!(
            resolve_description(None, &config, &repo).as_deref(),
            Some("from config")
        );

        let mut entry = named("package1");
        entry.description = Some("from override".to_string());
        assert_eq!(
            resolve_description(Some(&entry), &config, &repo).as_deref(),
            Some("from override")
        );
    }

    #[test]
    fn website_false_hides_homepage() {
        let repo = repository();
        let config = ProjectRc {
            website: Some(Setting::Enabled(true)),
            ..Default::default()
        };
        assert_eq!(
            resolve_website(None, &config, &repo).as_deref(),
            Some("https://projectrc.dev")
        );

        let mut entry = named("package2");
        entry.website = Some(Setting::Enabled(false));
        assert_eq!(resolve_website(Some(&entry), &config, &repo), None);

        entry.website = Some(Setting::Value("https://docs.dev".to_string()));
        assert_eq!(
            resolve_website(Some(&entry), &config, &repo).as_deref(),
            Some("https://docs.dev")
        );
    }

    #[test]
    fn extras_merge_per_field() {
        let config = ProjectRc {
            extras: Some(Extras {
                stars: Some(true),
                npm: Some(NpmSetting::Enabled(true)),
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut entry = named("package1");
        entry.extras = Some(Extras {
            npm: Some(NpmSetting::Options(NpmOptions {
                enabled: false,
                name: None,
                downloads: None,
            })),
            ..Default::default()
        });

        let merged = resolve_extras(Some(&entry), &config).unwrap();
        assert_eq!(merged.stars, Some(true));
        assert!(!resolve_npm_setting(Some(&merged)).unwrap().options().enabled);
        assert_eq!(resolve_extras(None, &ProjectRc::default()), None);
    }

    #[test]
    fn readme_and_meta_prefer_override() {
        let config = ProjectRc {
            readme: Some(Setting::Enabled(true)),
            meta: Some(Meta {
                title: Some("config".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut entry = named("package2");
        entry.readme = Some(Setting::Value("/README.md".to_string()));

        assert_eq!(
            resolve_readme_setting(Some(&entry), &config),
            Some(&Setting::Value("/README.md".to_string()))
        );
        assert_eq!(
            resolve_readme_setting(None, &config),
            Some(&Setting::Enabled(true))
        );
        assert_eq!(
            resolve_meta(Some(&entry), &config).unwrap().title.as_deref(),
            Some("config")
        );
    }
}
