//! Canned OMNI archive responses.
//!
//! Shapes follow what omniweb serves: an HTML availability table, a CGI
//! result page linking a `.lst` listing, and the whitespace separated listing
//! itself (`year doy hour minute |B| Bx By Bz`).

/// Availability page excerpt; the first IMF row runs to 2026-10-01.
pub const AVAILABILITY_HTML: &str = r#"<html><body>
<h2>OMNIWeb data availability</h2>
<pre>
 Dataset      Start        End          Contents
 OMNI 1-hr    1963-11-27   2026-10-01   IMF, plasma, indices
 HRO 1-min    1995-01-01   2026-09-14   IMF, plasma
</pre>
</body></html>
"#;

/// Availability page without any IMF row.
pub const AVAILABILITY_HTML_NO_IMF: &str = "<html><body><p>maintenance</p></body></html>\n";

/// IMF availability date in [`AVAILABILITY_HTML`].
pub const AVAILABILITY_DATE: &str = "2026-10-01";

/// Three good records and one fill record for 2017-03-01 (day 60).
pub const OMNI_LISTING: &str = "\
2017  60  0  0    4.52   -1.23    2.34   -3.01
2017  60  0  1    4.60   -1.20    2.40   -3.10
2017  60  0  2 9999.99 9999.99 9999.99 9999.99
2017  60 23 59    5.01    0.50   -2.20    4.10
";

/// Records that are all fill values.
pub const OMNI_LISTING_ALL_BAD: &str = "\
2017  60  0  0 9999.99 9999.99 9999.99 9999.99
2017  60  0  1 9999.99 9999.99 9999.99 9999.99
";

/// IMF lines expected from [`OMNI_LISTING`].
pub const IMF_EXPECTED: [&str; 4] = [
    "2017 03 01 0 0 00 -1.23 2.34 -3.01",
    "2017 03 01 0 1 00 -1.20 2.40 -3.10",
    "2017 03 01 0 2 00 9999.99 9999.99 9999.99",
    "2017 03 01 23 59 00 0.50 -2.20 4.10",
];

/// CGI result page pointing at `listing_url`.
pub fn cgi_response(listing_url: &str) -> String {
    format!(
        "<HTML><HEAD><TITLE>OMNIWeb Results</TITLE></HEAD><BODY>\n\
         <B>Listing:</B> <a href=\"{url}\">{url}</a>\n\
         </BODY></HTML>\n",
        url = listing_url
    )
}

/// CGI result page reporting an error without a listing link.
pub const CGI_RESPONSE_NO_LISTING: &str =
    "<HTML><BODY><B>Error:</B> start date is out of range</BODY></HTML>\n";
