// Per-language stopword lists used for keyword ranking
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

const STOPWORDS_EN: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few",
    "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "itself", "just", "may", "me", "might", "more", "most", "much", "must", "my", "myself",
    "new", "no", "nor", "not", "now", "of", "off", "on", "once", "one", "only", "or", "other",
    "our", "ours", "ourselves", "out", "over", "own", "said", "same", "says", "she", "should",
    "so", "some", "such", "than", "that", "the", "their", "theirs", "them", "themselves",
    "then", "there", "these", "they", "this", "those", "through", "to", "too", "two", "under",
    "until", "up", "us", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "year", "years", "you", "your",
    "yours", "yourself",
];

const STOPWORDS_FR: &[&str] = &[
    "à", "afin", "ainsi", "alors", "après", "au", "aucun", "aussi", "autre", "aux", "avant",
    "avec", "avoir", "cela", "celle", "celles", "celui", "ces", "cet", "cette", "ceux", "chez",
    "comme", "comment", "dans", "de", "depuis", "des", "deux", "doit", "donc", "dont", "du",
    "elle", "elles", "en", "encore", "entre", "est", "été", "être", "et", "eux", "fait", "faire",
    "il", "ils", "je", "jusqu", "la", "le", "les", "leur", "leurs", "lors", "lui", "mais", "même",
    "mes", "moins", "mon", "ne", "ni", "nos", "notre", "nous", "on", "ont", "ou", "où", "par",
    "parce", "pas", "peu", "peut", "plus", "pour", "pourquoi", "quand", "que", "quel", "quelle",
    "quelles", "quels", "qui", "quoi", "sa", "sans", "se", "selon", "ses", "si", "son", "sont",
    "sous", "sur", "ta", "tant", "tes", "ton", "tous", "tout", "toute", "toutes", "très", "trop",
    "un", "une", "vers", "vos", "votre", "vous", "année", "années", "aujourd", "hui",
];

const STOPWORDS_ES: &[&str] = &[
    "a", "al", "algo", "algunos", "ante", "antes", "año", "años", "como", "con", "contra",
    "cual", "cuando", "de", "del", "desde", "donde", "dos", "durante", "e", "el", "ella",
    "ellas", "ellos", "en", "entre", "era", "es", "esa", "ese", "eso", "esta", "está", "están",
    "este", "esto", "estos", "fue", "fueron", "ha", "había", "han", "hasta", "hay", "la", "las",
    "le", "les", "lo", "los", "más", "me", "mi", "muy", "nada", "ni", "no", "nos", "nosotros",
    "o", "otra", "otro", "otros", "para", "pero", "poco", "por", "porque", "que", "qué", "quien",
    "se", "sea", "según", "ser", "si", "sí", "sin", "sobre", "son", "su", "sus", "también",
    "tanto", "te", "tiene", "todo", "todos", "tras", "tu", "un", "una", "uno", "unos", "y", "ya",
];

const STOPWORDS_DE: &[&str] = &[
    "aber", "alle", "als", "also", "am", "an", "auch", "auf", "aus", "bei", "bis", "das", "dass",
    "dem", "den", "der", "des", "die", "doch", "dort", "durch", "ein", "eine", "einem", "einen",
    "einer", "eines", "er", "es", "für", "gegen", "hat", "hatte", "haben", "ich", "ihr", "ihre",
    "im", "in", "ist", "jahr", "jahre", "kann", "kein", "mit", "nach", "nicht", "noch", "nun",
    "nur", "ob", "oder", "ohne", "sein", "seine", "sich", "sie", "sind", "so", "soll", "über",
    "um", "und", "uns", "unter", "vom", "von", "vor", "war", "waren", "was", "weil", "wenn",
    "werden", "wie", "wir", "wird", "wurde", "wurden", "zu", "zum", "zur", "zwei", "zwischen",
];

const STOPWORDS_IT: &[&str] = &[
    "a", "ad", "al", "alla", "alle", "anche", "anno", "anni", "che", "chi", "con", "contro",
    "da", "dal", "dalla", "dei", "del", "della", "delle", "dello", "di", "dopo", "due", "e", "è",
    "gli", "ha", "hanno", "i", "il", "in", "la", "le", "lo", "loro", "ma", "nel", "nella", "non",
    "o", "per", "più", "quando", "quello", "questa", "questo", "se", "sono", "su", "sua", "sue",
    "sui", "sul", "sulla", "suo", "tra", "un", "una", "uno", "come", "essere", "stato",
];

const STOPWORDS_PT: &[&str] = &[
    "a", "ao", "aos", "as", "até", "com", "como", "da", "das", "de", "do", "dos", "e", "é", "ela",
    "ele", "eles", "em", "entre", "era", "essa", "esse", "esta", "está", "este", "foi", "foram",
    "há", "isso", "já", "lhe", "mais", "mas", "na", "nas", "não", "no", "nos", "o", "os", "ou",
    "para", "pela", "pelo", "por", "quando", "que", "se", "sem", "ser", "seu", "sua", "são",
    "também", "um", "uma", "ano", "anos", "dois", "sobre", "ainda", "muito",
];

fn to_set(words: &'static [&'static str]) -> HashSet<&'static str> {
    words.iter().copied().collect()
}

static ENGLISH: LazyLock<HashSet<&'static str>> = LazyLock::new(|| to_set(STOPWORDS_EN));

static OTHER_LANGUAGES: LazyLock<HashMap<&'static str, HashSet<&'static str>>> = LazyLock::new(|| {
    [
        ("fr", STOPWORDS_FR),
        ("es", STOPWORDS_ES),
        ("de", STOPWORDS_DE),
        ("it", STOPWORDS_IT),
        ("pt", STOPWORDS_PT),
    ]
    .into_iter()
    .map(|(code, words)| (code, to_set(words)))
    .collect()
});

/// Stopwords for a primary language subtag; languages without a list use English.
pub fn for_language(language: &str) -> &'static HashSet<&'static str> {
    OTHER_LANGUAGES
        .get(language.to_ascii_lowercase().as_str())
        .unwrap_or(&*ENGLISH)
}
