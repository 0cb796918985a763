use reqwest::header::HeaderMap;

pub(crate) fn next_page_from_link_header(headers: &HeaderMap) -> Option<u32> {
    let link = headers.get("link")?.to_str().ok()?;
    for part in link.split(',') {
        let part = part.trim();
        if !part.contains("rel=\"next\"") {
            continue;
        }
        let start = part.find('<')? + 1;
        let end = part.find('>')?;
        let url = &part[start..end];
        for pair in url.split('?').nth(1).unwrap_or("").split('&') {
            let mut iter = pair.splitn(2, '=');
            let key = iter.next().unwrap_or("");
            let value = iter.next().unwrap_or("");
            if key == "page"
                && let Ok(page) = value.parse::<u32>()
            {
                return Some(page);
            }
        }
    }
    None
}
