use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Known misspellings with a single high-confidence correction.
const TYPO_RULES: &[(&str, &str)] = &[
    // everyday English
    ("teh", "the"),
    ("adn", "and"),
    ("thsi", "this"),
    ("tihs", "this"),
    ("wiht", "with"),
    ("whith", "with"),
    ("wich", "which"),
    ("thier", "their"),
    ("recieve", "receive"),
    ("recieved", "received"),
    ("reciever", "receiver"),
    ("seperate", "separate"),
    ("seperated", "separated"),
    ("seperator", "separator"),
    ("occured", "occurred"),
    ("occurence", "occurrence"),
    ("untill", "until"),
    ("wierd", "weird"),
    ("accross", "across"),
    ("acheive", "achieve"),
    ("adress", "address"),
    ("begining", "beginning"),
    ("beleive", "believe"),
    ("calender", "calendar"),
    ("definately", "definitely"),
    ("explaination", "explanation"),
    ("posible", "possible"),
    ("similiar", "similar"),
    ("becuase", "because"),
    ("becasue", "because"),
    ("beacuse", "because"),
    ("woudl", "would"),
    ("shoudl", "should"),
    ("coudl", "could"),
    ("alot", "a lot"),
    ("succesful", "successful"),
    ("sucessful", "successful"),
    ("successfull", "successful"),
    ("succesfully", "successfully"),
    ("compatability", "compatibility"),
    ("existant", "existent"),
    ("neccessary", "necessary"),
    ("necesary", "necessary"),
    ("occassionally", "occasionally"),
    ("publically", "publicly"),
    ("truely", "truly"),
    ("usefull", "useful"),
    // programming vocabulary
    ("fucntion", "function"),
    ("funciton", "function"),
    ("functon", "function"),
    ("fuction", "function"),
    ("fucntionality", "functionality"),
    ("handls", "handles"),
    ("hadnle", "handle"),
    ("handel", "handle"),
    ("authetication", "authentication"),
    ("authentification", "authentication"),
    ("authenication", "authentication"),
    ("autorization", "authorization"),
    ("lenght", "length"),
    ("widht", "width"),
    ("heigth", "height"),
    ("retrun", "return"),
    ("reutrn", "return"),
    ("improt", "import"),
    ("udpate", "update"),
    ("upate", "update"),
    ("updaet", "update"),
    ("dependecy", "dependency"),
    ("dependancy", "dependency"),
    ("dependancies", "dependencies"),
    ("enviroment", "environment"),
    ("enviornment", "environment"),
    ("configuraton", "configuration"),
    ("confgiuration", "configuration"),
    ("initalize", "initialize"),
    ("intialize", "initialize"),
    ("initalization", "initialization"),
    ("paramter", "parameter"),
    ("paramater", "parameter"),
    ("parmeter", "parameter"),
    ("arguement", "argument"),
    ("arguements", "arguments"),
    ("refrence", "reference"),
    ("refernce", "reference"),
    ("databse", "database"),
    ("datbase", "database"),
    ("respone", "response"),
    ("reponse", "response"),
    ("requst", "request"),
    ("reqeust", "request"),
    ("verison", "version"),
    ("verion", "version"),
    ("commited", "committed"),
    ("comitted", "committed"),
    ("commmit", "commit"),
    ("perfomance", "performance"),
    ("preformance", "performance"),
    ("proccess", "process"),
    ("proces", "process"),
    ("remvoe", "remove"),
    ("remoev", "remove"),
    ("sytem", "system"),
    ("tempalte", "template"),
    ("mesage", "message"),
    ("messsage", "message"),
    ("valdiate", "validate"),
    ("validaton", "validation"),
    ("erorr", "error"),
    ("eror", "error"),
    ("errror", "error"),
    ("exeption", "exception"),
    ("excpetion", "exception"),
    ("implment", "implement"),
    ("implemenation", "implementation"),
    ("implmentation", "implementation"),
    ("ouput", "output"),
    ("outptu", "output"),
    ("inptu", "input"),
    ("pacakge", "package"),
    ("packge", "package"),
    ("reigster", "register"),
    ("resovle", "resolve"),
    ("retreive", "retrieve"),
    ("serach", "search"),
    ("strign", "string"),
    ("stirng", "string"),
    ("tyep", "type"),
    ("varaible", "variable"),
    ("varible", "variable"),
    ("propery", "property"),
    ("proprety", "property"),
    ("comopnent", "component"),
    ("compnent", "component"),
    ("refactr", "refactor"),
    ("optimze", "optimize"),
    ("optmize", "optimize"),
    ("perfrom", "perform"),
    ("asynchornous", "asynchronous"),
    ("synchornous", "synchronous"),
    ("cahce", "cache"),
    ("chache", "cache"),
    ("compiel", "compile"),
    ("depricated", "deprecated"),
    ("deprected", "deprecated"),
    ("doucment", "document"),
    ("documetation", "documentation"),
    ("documantation", "documentation"),
    ("exmaple", "example"),
    ("exampel", "example"),
    ("featrue", "feature"),
    ("fetaure", "feature"),
    ("intergration", "integration"),
    ("libary", "library"),
    ("licence", "license"),
    ("mehtod", "method"),
    ("methdo", "method"),
    ("migraiton", "migration"),
    ("permision", "permission"),
    ("permisions", "permissions"),
    ("quereis", "queries"),
    ("recursivly", "recursively"),
    ("rendring", "rendering"),
    ("repsonse", "response"),
    ("schmea", "schema"),
    ("settigns", "settings"),
    ("statment", "statement"),
    ("stuct", "struct"),
    ("suport", "support"),
    ("supprot", "support"),
    ("threshhold", "threshold"),
    ("timout", "timeout"),
    ("trasnform", "transform"),
    ("uesr", "user"),
    ("usre", "user"),
];

/// Jargon that must never be flagged, whatever the general dictionary says.
const TECHNICAL_TERMS: &[&str] = &[
    // languages and formats
    "javascript", "typescript", "python", "golang", "rust", "rustlang", "java", "kotlin",
    "swift", "ruby", "php", "scala", "haskell", "elixir", "erlang", "clojure", "csharp",
    "cpp", "html", "css", "scss", "sass", "json", "jsonl", "yaml", "yml", "toml", "xml",
    "csv", "sql", "graphql", "markdown", "wasm", "webassembly", "protobuf", "lua", "bash",
    "zsh", "powershell",
    // frameworks and tooling
    "react", "reactjs", "vue", "vuejs", "angular", "svelte", "nextjs", "nuxt", "django",
    "flask", "fastapi", "rails", "laravel", "spring", "express", "nestjs", "tailwind",
    "bootstrap", "jquery", "redux", "webpack", "vite", "rollup", "babel", "eslint",
    "prettier", "jest", "mocha", "vitest", "cypress", "playwright", "pytest", "npm",
    "npx", "yarn", "pnpm", "pip", "cargo", "rustc", "rustup", "clippy", "rustfmt",
    "gradle", "maven", "nodejs", "deno", "tokio", "serde", "graphene", "numpy", "pandas",
    // protocols and standards
    "http", "https", "tcp", "udp", "ssh", "ssl", "tls", "dns", "ftp", "sftp", "smtp",
    "imap", "grpc", "rest", "restful", "websocket", "websockets", "oauth", "oidc", "saml",
    "jwt", "jwts", "cors", "csrf", "xss", "api", "apis", "uri", "uris", "url", "urls",
    "uuid", "uuids", "ascii", "utf", "unicode", "mime", "ipv", "cidr", "sso", "mfa",
    // infrastructure and data stores
    "kubernetes", "kubectl", "docker", "dockerfile", "podman", "helm", "terraform",
    "ansible", "nginx", "apache", "redis", "postgres", "postgresql", "mysql", "sqlite",
    "mongodb", "mongo", "kafka", "rabbitmq", "elasticsearch", "aws", "gcp", "azure",
    "lambda", "serverless", "github", "gitlab", "bitbucket", "jenkins", "circleci",
    "devops", "prometheus", "grafana", "datadog", "sentry", "cloudflare", "vercel",
    "netlify", "heroku", "linux", "macos", "unix", "posix", "systemd", "cron", "crontab",
    // git and workflow vocabulary
    "git", "repo", "repos", "rebase", "rebased", "rebasing", "stash", "stashed",
    "gitignore", "gitattributes", "submodule", "submodules", "changelog", "semver",
    "monorepo", "upstream", "readme", "linter", "lint", "linting", "refactor",
    "refactored", "refactoring", "hotfix", "bugfix", "wip", "todo", "fixme", "deps",
    "init", "precommit", "codeowners", "dependabot", "renovate", "noop", "checkout",
    // general programming
    "config", "configs", "env", "envs", "dev", "prod", "auth", "async", "await",
    "const", "enum", "enums", "struct", "structs", "impl", "bool", "boolean", "int",
    "str", "stdin", "stdout", "stderr", "regex", "regexes", "regexp", "tuple", "iter",
    "args", "argv", "params", "middleware", "backend", "frontend", "fullstack",
    "localhost", "cli", "tui", "gui", "sdk", "orm", "crud", "dto", "ssr", "spa", "pwa",
    "cdn", "cpu", "gpu", "ram", "ssd", "ide", "vscode", "vim", "neovim", "emacs",
    "webhook", "webhooks", "namespace", "namespaces", "runtime", "runtimes",
    "dockerized", "containerized", "subcommand", "subcommands", "codebase", "tooling",
    "workflow", "workflows", "dedupe", "dedup", "mutex", "mutexes", "stdlib", "typedef",
    "boilerplate", "lifecycle", "hashmap", "hashset", "btree", "vec", "nullable",
    "serializer", "deserializer", "deserialize", "serialization", "deserialization",
    "unmarshal", "codegen", "mixin", "mixins", "getter", "getters", "setter", "setters",
    "timestamp", "timestamps", "tokenizer", "tokenize", "lockfile", "keybinding",
    "keybindings", "autocomplete", "changeset", "dataset", "datasets", "debounce",
    "debounced", "todos", "metadata", "util", "utils", "impls", "usize", "println",
    // contraction stems left over after splitting on apostrophes
    "doesn", "isn", "wasn", "didn", "couldn", "shouldn", "wouldn", "aren", "weren",
    "hasn", "haven", "hadn", "mustn", "needn",
];

lazy_static! {
    static ref BUILTIN: Arc<SpellTables> = Arc::new(SpellTables::new(
        TYPO_RULES
            .iter()
            .map(|(typo, fix)| (typo.to_string(), fix.to_string())),
        TECHNICAL_TERMS.iter().map(|w| w.to_string()),
    ));
}

/// Read-only lookup tables consulted before the general dictionary.
#[derive(Debug, Clone, Default)]
pub struct SpellTables {
    typos: HashMap<String, String>,
    technical: HashSet<String>,
}

impl SpellTables {
    /// Build tables from arbitrary entries. Keys are lowercased.
    pub fn new<T, W>(typos: T, technical: W) -> Self
    where
        T: IntoIterator<Item = (String, String)>,
        W: IntoIterator<Item = String>,
    {
        Self {
            typos: typos
                .into_iter()
                .map(|(typo, fix)| (typo.to_lowercase(), fix))
                .collect(),
            technical: technical.into_iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    /// Process-wide built-in tables, loaded on first use.
    pub fn builtin() -> Arc<SpellTables> {
        Arc::clone(&BUILTIN)
    }

    /// Copy of these tables with additional entries layered on top.
    /// Extra typo rules override built-in ones with the same key.
    pub fn extended<T, W>(&self, typos: T, technical: W) -> Self
    where
        T: IntoIterator<Item = (String, String)>,
        W: IntoIterator<Item = String>,
    {
        let mut tables = self.clone();
        tables.typos.extend(
            typos
                .into_iter()
                .map(|(typo, fix)| (typo.to_lowercase(), fix)),
        );
        tables
            .technical
            .extend(technical.into_iter().map(|w| w.to_lowercase()));
        tables
    }

    pub fn correction(&self, lowercase: &str) -> Option<&str> {
        self.typos.get(lowercase).map(String::as_str)
    }

    pub fn is_technical(&self, lowercase: &str) -> bool {
        self.technical.contains(lowercase)
    }

    pub fn typo_rule_count(&self) -> usize {
        self.typos.len()
    }

    pub fn technical_word_count(&self) -> usize {
        self.technical.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_loaded() {
        let tables = SpellTables::builtin();
        assert_eq!(tables.correction("teh"), Some("the"));
        assert_eq!(tables.correction("fucntion"), Some("function"));
        assert!(tables.is_technical("kubernetes"));
        assert!(tables.is_technical("jwt"));
    }

    #[test]
    fn test_no_rule_targets_a_typo_key() {
        let tables = SpellTables::builtin();
        for (_, fix) in TYPO_RULES {
            for word in fix.split(' ') {
                assert!(
                    tables.correction(word).is_none() || tables.correction(word) == Some(word),
                    "correction '{}' is itself a typo key",
                    word
                );
            }
        }
    }

    #[test]
    fn test_extended_overrides_and_lowercases() {
        let tables = SpellTables::builtin().extended(
            vec![("TEH".to_string(), "thee".to_string())],
            vec!["Spellcommit".to_string()],
        );
        assert_eq!(tables.correction("teh"), Some("thee"));
        assert!(tables.is_technical("spellcommit"));
        // builtin stays untouched
        assert_eq!(SpellTables::builtin().correction("teh"), Some("the"));
    }
}
