//! Rendering the cold-start log message.
//!
//! Templates use Jinja syntax (via `minijinja`). Besides the values from the
//! parameter file, every render gets an `Items` sequence: a fresh random
//! permutation of `0..ITEM_COUNT`. The random source is supplied by the
//! caller so that renders can be reproduced.

use minijinja::{Environment, UndefinedBehavior};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde_json::Value;
use std::{
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};
use thiserror::Error;

use lambda_runtime::tracing;

use crate::params::TemplateContext;

pub const ITEMS_KEY: &str = "Items";
pub const ITEM_COUNT: u32 = 9000;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to load template `{name}`")]
    TemplateLoad {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("failed to render template `{name}`")]
    TemplateRender {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}

pub struct Renderer {
    env: Environment<'static>,
}

impl Default for Renderer {
    fn default() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        Renderer { env }
    }
}

impl Renderer {
    /// A renderer that loads templates from files in `dir` on first use.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Self {
        let mut r = Renderer::default();
        r.env.set_loader(minijinja::path_loader(dir.as_ref().to_owned()));
        r
    }

    /// Register a template from source text. Syntax errors show up here
    /// rather than at render time.
    pub fn add_template<N, S>(&mut self, name: N, source: S) -> Result<(), RenderError>
    where
        N: Into<String>,
        S: Into<String>,
    {
        let name = name.into();
        self.env
            .add_template_owned(name.clone(), source.into())
            .map_err(|e| RenderError::TemplateLoad { name, source: e })
    }

    pub fn render<R: Rng + ?Sized>(
        &self,
        name: &str,
        context: &TemplateContext,
        rng: &mut R,
    ) -> Result<String, RenderError> {
        let tmpl = self
            .env
            .get_template(name)
            .map_err(|e| RenderError::TemplateLoad {
                name: name.to_owned(),
                source: e,
            })?;

        let mut context = context.clone();
        let items = Value::from(shuffled_items(ITEM_COUNT, rng));

        if context.insert(ITEMS_KEY, items).is_some() {
            tracing::warn!("template context already had an `{ITEMS_KEY}` entry; replaced it");
        }

        tmpl.render(&context)
            .map_err(|e| RenderError::TemplateRender {
                name: name.to_owned(),
                source: e,
            })
    }
}

/// A uniformly random permutation of `0..n`.
pub fn shuffled_items<R: Rng + ?Sized>(n: u32, rng: &mut R) -> Vec<u32> {
    let mut items: Vec<u32> = (0..n).collect();
    items.shuffle(rng);
    items
}

/// Seed derived from the wall clock, for when nobody asked for a specific one.
pub fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ConfigRecord;

    fn context() -> TemplateContext {
        ConfigRecord {
            app_name: "modamodApp".to_owned(),
            version: "1.0.1.0".to_owned(),
            app_full_name: "My Awesome App".to_owned(),
            client: "modamod".to_owned(),
            env: "dev".to_owned(),
        }
        .to_context()
    }

    fn renderer(source: &str) -> Renderer {
        let mut r = Renderer::default();
        r.add_template("t", source).unwrap();
        r
    }

    #[test]
    fn same_seed_same_output() {
        let r = renderer("{{ AppName }} {{ Items[:20] }}");
        let a = r.render("t", &context(), &mut seeded_rng(42)).unwrap();
        let b = r.render("t", &context(), &mut seeded_rng(42)).unwrap();
        assert_eq!(a, b);
        assert!(a.starts_with("modamodApp ["));
    }

    #[test]
    fn seed_only_affects_items() {
        let r = renderer("{{ AppFullName }}/{{ Client }}/{{ Env }}/{{ Version }}|{{ Items | join(',') }}");
        let a = r.render("t", &context(), &mut seeded_rng(1)).unwrap();
        let b = r.render("t", &context(), &mut seeded_rng(2)).unwrap();

        let (a_fixed, a_items) = a.split_once('|').unwrap();
        let (b_fixed, b_items) = b.split_once('|').unwrap();
        assert_eq!(a_fixed, "My Awesome App/modamod/dev/1.0.1.0");
        assert_eq!(a_fixed, b_fixed);
        assert_ne!(a_items, b_items);
    }

    #[test]
    fn items_is_a_permutation() {
        let r = renderer("{{ Items | join(',') }}");
        let out = r.render("t", &context(), &mut seeded_rng(7)).unwrap();

        let mut values: Vec<u32> = out.split(',').map(|s| s.parse().unwrap()).collect();
        assert_eq!(values.len(), ITEM_COUNT as usize);
        values.sort_unstable();
        assert!(values.iter().copied().eq(0..ITEM_COUNT));
    }

    #[test]
    fn caller_context_is_untouched() {
        let r = renderer("{{ Items | length }}");
        let ctx = context();
        let out = r.render("t", &ctx, &mut seeded_rng(3)).unwrap();
        assert_eq!(out, "9000");
        assert!(!ctx.contains_key(ITEMS_KEY));
    }

    #[test]
    fn unknown_template_fails_to_load() {
        let r = Renderer::default();
        let err = r.render("nope.template", &context(), &mut seeded_rng(0)).unwrap_err();
        assert!(matches!(err, RenderError::TemplateLoad { ref name, .. } if name == "nope.template"));
    }

    #[test]
    fn missing_template_file_fails_to_load() {
        let r = Renderer::from_dir(std::env::temp_dir().join("hello-world-lambda-no-templates"));
        let err = r.render("log.template", &context(), &mut seeded_rng(0)).unwrap_err();
        assert!(matches!(err, RenderError::TemplateLoad { .. }));
    }

    #[test]
    fn syntax_error_fails_to_load() {
        let mut r = Renderer::default();
        let err = r.add_template("broken", "{% for x in %}").unwrap_err();
        assert!(matches!(err, RenderError::TemplateLoad { .. }));
    }

    #[test]
    fn unresolvable_variable_fails_to_render() {
        let r = renderer("{{ AppName }} {{ NoSuchThing }}");
        let err = r.render("t", &context(), &mut seeded_rng(0)).unwrap_err();
        assert!(matches!(err, RenderError::TemplateRender { ref name, .. } if name == "t"));
    }

    #[test]
    fn shuffle_depends_on_seed() {
        let a = shuffled_items(100, &mut seeded_rng(10));
        let b = shuffled_items(100, &mut seeded_rng(10));
        let c = shuffled_items(100, &mut seeded_rng(11));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(shuffled_items(0, &mut seeded_rng(10)).is_empty());
    }
}
