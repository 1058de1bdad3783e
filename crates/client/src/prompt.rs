//! Summary prompt templates.
//!
//! Turkish, Spanish, French, German, Italian, Portuguese and Russian pages get
//! a prompt written in that language; every other language gets the English
//! template, which names the detected language and asks for a reply in it.

pub const DEFAULT_MAX_CHARS: usize = 8_000;

const FALLBACK_LANGUAGE: &str = "English";

const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("zh", "Chinese"),
    ("zh-cn", "Chinese (Simplified)"),
    ("zh-tw", "Chinese (Traditional)"),
    ("ar", "Arabic"),
    ("hi", "Hindi"),
    ("th", "Thai"),
    ("vi", "Vietnamese"),
    ("tr", "Turkish"),
    ("pl", "Polish"),
    ("nl", "Dutch"),
    ("sv", "Swedish"),
    ("no", "Norwegian"),
    ("da", "Danish"),
    ("fi", "Finnish"),
    ("he", "Hebrew"),
    ("cs", "Czech"),
    ("sk", "Slovak"),
    ("hu", "Hungarian"),
    ("ro", "Romanian"),
    ("bg", "Bulgarian"),
    ("hr", "Croatian"),
    ("sr", "Serbian"),
    ("sl", "Slovenian"),
    ("et", "Estonian"),
    ("lv", "Latvian"),
    ("lt", "Lithuanian"),
    ("uk", "Ukrainian"),
    ("el", "Greek"),
    ("ca", "Catalan"),
    ("eu", "Basque"),
    ("gl", "Galician"),
    ("mt", "Maltese"),
    ("cy", "Welsh"),
    ("ga", "Irish"),
    ("is", "Icelandic"),
    ("mk", "Macedonian"),
    ("sq", "Albanian"),
    ("be", "Belarusian"),
    ("ka", "Georgian"),
    ("hy", "Armenian"),
    ("az", "Azerbaijani"),
    ("kk", "Kazakh"),
    ("ky", "Kyrgyz"),
    ("uz", "Uzbek"),
    ("tg", "Tajik"),
    ("mn", "Mongolian"),
    ("ne", "Nepali"),
    ("si", "Sinhala"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("ml", "Malayalam"),
    ("kn", "Kannada"),
    ("bn", "Bengali"),
    ("gu", "Gujarati"),
    ("pa", "Punjabi"),
    ("ur", "Urdu"),
    ("fa", "Persian"),
    ("ps", "Pashto"),
    ("ku", "Kurdish"),
    ("sd", "Sindhi"),
    ("my", "Myanmar"),
    ("km", "Khmer"),
    ("lo", "Lao"),
    ("am", "Amharic"),
    ("ti", "Tigrinya"),
    ("or", "Oriya"),
    ("as", "Assamese"),
    ("mr", "Marathi"),
    ("sa", "Sanskrit"),
    ("sw", "Swahili"),
    ("zu", "Zulu"),
    ("af", "Afrikaans"),
    ("xh", "Xhosa"),
    ("st", "Sesotho"),
    ("tn", "Setswana"),
    ("ve", "Venda"),
    ("ts", "Tsonga"),
    ("ss", "Siswati"),
    ("nr", "Ndebele"),
    ("nso", "Northern Sotho"),
    ("ig", "Igbo"),
    ("yo", "Yoruba"),
    ("ha", "Hausa"),
    ("ff", "Fulah"),
];

fn lookup(code: &str) -> Option<&'static str> {
    LANGUAGE_NAMES.iter().find(|(c, _)| *c == code).map(|(_, name)| *name)
}

/// Primary subtag of a language tag, lowercased: `pt-BR` -> `pt`.
pub fn primary_subtag(code: &str) -> String {
    code.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Display name for a language tag. The primary subtag is tried first, then
/// the whole tag; unknown codes map to English.
pub fn language_name(code: &str) -> &'static str {
    let full = code.trim().to_lowercase();
    lookup(&primary_subtag(code))
        .or_else(|| lookup(&full))
        .unwrap_or(FALLBACK_LANGUAGE)
}

/// First `max_chars` characters of `content`.
fn truncate(content: &str, max_chars: usize) -> &str {
    match content.char_indices().nth(max_chars) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}

/// Build the summary prompt for a page in `language_code`.
pub fn build_prompt(language_code: &str, content: &str, max_chars: usize) -> String {
    let content = truncate(content, max_chars);

    match primary_subtag(language_code).as_str() {
        "tr" => format!(
            "Aşağıdaki web sayfası içeriğini analiz edin ve özetleyin. İçerik Türkçe görünüyor.

ÖNEMLİ: Lütfen yanıtınızı Türkçe olarak verin.

Lütfen şunları sağlayın:
1. Temel bilgileri vurgulayan üç kısa madde işareti
2. Genel içeriği özetleyen kısa bir paragraf (2-3 cümle)

Yanıtınızı markdown formatında, açık başlıklarla biçimlendirin. Kısa ve bilgilendirici tutun.

Özetlenecek içerik:
{content}"
        ),
        "es" => format!(
            "Por favor, analiza y resume el siguiente contenido de la página web. El contenido parece estar en español.

IMPORTANTE: Por favor responde en español.

Proporciona:
1. Tres puntos concisos que destaquen la información clave
2. Un párrafo corto (2-3 oraciones) que resuma el contenido general

Formatea tu respuesta en markdown con encabezados claros. Manténlo conciso e informativo.

Contenido a resumir:
{content}"
        ),
        "fr" => format!(
            "Veuillez analyser et résumer le contenu de la page web suivante. Le contenu semble être en français.

IMPORTANT: Veuillez répondre en français.

Fournissez:
1. Trois points concis mettant en évidence les informations clés
2. Un court paragraphe (2-3 phrases) résumant le contenu général

Formatez votre réponse en markdown avec des titres clairs. Restez concis et informatif.

Contenu à résumer:
{content}"
        ),
        "de" => format!(
            "Bitte analysieren und fassen Sie den folgenden Webseiteninhalt zusammen. Der Inhalt scheint auf Deutsch zu sein.

WICHTIG: Bitte antworten Sie auf Deutsch.

Stellen Sie bereit:
1. Drei prägnante Stichpunkte, die die Schlüsselinformationen hervorheben
2. Einen kurzen Absatz (2-3 Sätze), der den Gesamtinhalt zusammenfasst

Formatieren Sie Ihre Antwort in Markdown mit klaren Überschriften. Halten Sie es präzise und informativ.

Zusammenzufassender Inhalt:
{content}"
        ),
        "it" => format!(
            "Si prega di analizzare e riassumere il seguente contenuto della pagina web. Il contenuto sembra essere in italiano.

IMPORTANTE: Si prega di rispondere in italiano.

Fornire:
1. Tre punti concisi che evidenziano le informazioni chiave
2. Un breve paragrafo (2-3 frasi) che riassume il contenuto generale

Formattare la risposta in markdown con intestazioni chiare. Mantenerla concisa e informativa.

Contenuto da riassumere:
{content}"
        ),
        "pt" => format!(
            "Por favor, analise e resuma o seguinte conteúdo da página web. O conteúdo parece estar em português.

IMPORTANTE: Por favor responda em português.

Forneça:
1. Três pontos concisos destacando as informações principais
2. Um parágrafo curto (2-3 frases) resumindo o conteúdo geral

Formate sua resposta em markdown com cabeçalhos claros. Mantenha conciso e informativo.

Conteúdo para resumir:
{content}"
        ),
        "ru" => format!(
            "Пожалуйста, проанализируйте и обобщите следующий контент веб-страницы. Контент, похоже, на русском языке.

ВАЖНО: Пожалуйста, отвечайте на русском языке.

Предоставьте:
1. Три краткие маркированные пункта, выделяющие ключевую информацию
2. Один короткий абзац (2-3 предложения), обобщающий общий контент

Отформатируйте ваш ответ в markdown с четкими заголовками. Сделайте его кратким и информативным.

Контент для обобщения:
{content}"
        ),
        _ => {
            let language = language_name(language_code);
            format!(
                "Please analyze and summarize the following web page content. The content appears to be in {language}.

IMPORTANT: Please respond in the same language as the detected content ({language}). If the content is in a language other than English, provide the summary in that detected language.

Provide:
1. Three concise bullet points highlighting the key information
2. One short paragraph (2-3 sentences) summarizing the overall content

Format your response in markdown with clear headings. Keep it concise and informative.

Content to summarize:
{content}"
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_name() {
        assert_eq!(language_name("en"), "English");
        assert_eq!(language_name("pt-BR"), "Portuguese");
        assert_eq!(language_name("TR"), "Turkish");
        assert_eq!(language_name("nso"), "Northern Sotho");
        assert_eq!(language_name("xx"), "English");
        assert_eq!(language_name(""), "English");
    }

    #[test]
    fn test_primary_subtag_wins_over_full_tag() {
        assert_eq!(language_name("zh-TW"), "Chinese");
    }

    #[test]
    fn test_dedicated_templates() {
        let cases = [
            ("tr", "Özetlenecek içerik:"),
            ("es-MX", "Contenido a resumir:"),
            ("fr", "Contenu à résumer:"),
            ("de-AT", "Zusammenzufassender Inhalt:"),
            ("it", "Contenuto da riassumere:"),
            ("pt-BR", "Conteúdo para resumir:"),
            ("ru", "Контент для обобщения:"),
        ];
        for (code, marker) in cases {
            let prompt = build_prompt(code, "BODY", DEFAULT_MAX_CHARS);
            assert!(prompt.contains(marker), "{code} prompt is missing its marker");
            assert!(prompt.ends_with("\nBODY"));
        }
    }

    #[test]
    fn test_generic_template_names_language() {
        let prompt = build_prompt("ja", "本文", DEFAULT_MAX_CHARS);
        assert!(prompt.starts_with("Please analyze and summarize"));
        assert!(prompt.contains("The content appears to be in Japanese."));
        assert!(prompt.contains("(Japanese)"));
        assert!(prompt.ends_with("Content to summarize:\n本文"));

        let prompt = build_prompt("unknown", "x", DEFAULT_MAX_CHARS);
        assert!(prompt.contains("appears to be in English"));
    }

    #[test]
    fn test_content_truncated_by_chars() {
        let content = "é".repeat(10_000);
        let prompt = build_prompt("en", &content, DEFAULT_MAX_CHARS);
        let body = prompt.rsplit("Content to summarize:\n").next().unwrap();
        assert_eq!(body.chars().count(), DEFAULT_MAX_CHARS);

        assert_eq!(truncate("short", 100), "short");
        assert_eq!(truncate("abcdef", 3), "abc");
    }
}
