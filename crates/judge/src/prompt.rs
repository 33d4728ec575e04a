use extract::Claim;

/// A claim eligible for judging, numbered by its position in the full claim list.
#[derive(Debug, Clone, Copy)]
pub struct JudgeEntry<'a> {
    pub claim_index: usize,
    pub claim: &'a Claim,
    pub evidence: &'a str,
}

pub fn build_judge_prompt(entries: &[JudgeEntry<'_>]) -> String {
    let mut prompt = String::from(
        "You are a meticulous fact-checker. Fact-check each numbered claim below \
         based ONLY on the evidence snippets provided with it.\n\n",
    );

    prompt.push_str("CLAIMS:\n\n");
    for entry in entries {
        prompt.push_str(&format!(
            "CLAIM {}:\nText: \"{}\"\nEvidence: \"{}\"\n\n",
            entry.claim_index, entry.claim, entry.evidence
        ));
    }

    prompt.push_str(
        r#"JUDGING RULES:
1. Reporting that a rumor or allegation EXISTS is not confirmation. Only evidence that states the claim as established fact supports it.
2. If any evidence says "false claim", "debunked", "no evidence for" or similar about the claim, the status is CONTRADICTED.
3. Extraordinary claims need corroboration from multiple non-opinion sources. Otherwise the status is UNSURE.
4. If the claim takes literally what the evidence says figuratively (or the reverse), the status is CONTRADICTED.
5. If the evidence is irrelevant or insufficient, the status is UNSURE and the summary explains why.

CONFIDENCE SCORE (your certainty in the verdict, 0-100):
- 90-100: multiple strong sources corroborate the verdict
- 70-89: one strong source or several decent sources
- 40-69: vague evidence or a single mediocre source
- 0-39: weak or ambiguous evidence, or a guess

SOURCE TYPE (the apparent publisher of the evidence):
- GOVERNMENT: government agencies and official statistics
- ACADEMIC: universities, journals, scientific bodies
- NEWS: mainstream news organisations
- OPINION: opinion pieces, blogs, social media
- UNKNOWN: cannot be determined

OUTPUT:
Respond with a single JSON object with this EXACT schema, one entry per numbered claim, using the claim's number as claim_index:
{
  "results": [
    {
      "claim_index": 1,
      "status": "SUPPORTED" | "CONTRADICTED" | "UNSURE",
      "confidence_score": 0-100,
      "source_type": "GOVERNMENT" | "ACADEMIC" | "NEWS" | "OPINION" | "UNKNOWN",
      "evidence": "A brief, neutral summary of the findings."
    }
  ]
}
Output ONLY the JSON object, no markdown, no explanations."#,
    );

    prompt
}
