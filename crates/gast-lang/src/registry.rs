use std::collections::HashMap;
use std::sync::Arc;

use gast_core::LanguageFrontend;
use gast_java::JavaFrontend;
use gast_javascript::JsFrontend;
use gast_python::PyFrontend;

/// Maps language names and file extensions to frontends.
#[derive(Default, Clone)]
pub struct FrontendRegistry {
    lookup: HashMap<String, Arc<dyn LanguageFrontend>>, // lowercase key -> frontend
}

impl FrontendRegistry {
    pub fn new() -> Self {
        Self {
            lookup: HashMap::new(),
        }
    }

    /// Registry holding the Java, JavaScript and Python frontends.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(JavaFrontend::new()));
        registry.register(Arc::new(JsFrontend::new()));
        registry.register(Arc::new(PyFrontend::new()));
        registry
    }

    pub fn register(&mut self, frontend: Arc<dyn LanguageFrontend>) {
        let key = frontend.language().name().to_lowercase();
        self.lookup.insert(key, frontend.clone());
        for ext in frontend.extensions() {
            self.lookup.insert(ext.to_lowercase(), frontend.clone());
        }
    }

    /// Look up by language name (`"python"`) or extension (`"py"`).
    pub fn get(&self, key: &str) -> Option<Arc<dyn LanguageFrontend>> {
        self.lookup.get(&key.to_lowercase()).cloned()
    }

    pub fn merge(&mut self, other: &FrontendRegistry) {
        for (key, frontend) in &other.lookup {
            self.lookup.insert(key.clone(), frontend.clone());
        }
    }
}
